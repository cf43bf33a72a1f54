//! Error types for the GQL result pipeline

use serde_json::error::Category;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GqlError>;

#[derive(Error, Debug)]
pub enum GqlError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Well-formed JSON that does not fit the requested type
    #[error("Unexpected payload shape: {0}")]
    Shape(String),

    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Non-zero `code` in an exec response envelope
    #[error("Server error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GqlError {
    /// Get error code for display and wire reporting
    pub fn code(&self) -> &'static str {
        match self {
            GqlError::Syntax { .. } => "SYNTAX_ERROR",
            GqlError::Shape(_) => "SHAPE_ERROR",
            GqlError::InvalidNumber(_) => "INVALID_NUMBER",
            GqlError::Serialize(_) => "SERIALIZE_ERROR",
            GqlError::Server { .. } => "SERVER_ERROR",
            GqlError::Io(_) => "IO_ERROR",
        }
    }

    /// True when the payload text itself could not be decoded
    pub fn is_payload_error(&self) -> bool {
        matches!(self, GqlError::Syntax { .. } | GqlError::Shape(_))
    }
}

impl From<serde_json::Error> for GqlError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Syntax | Category::Eof => GqlError::Syntax {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            },
            Category::Data => GqlError::Shape(e.to_string()),
            Category::Io => GqlError::Serialize(e.to_string()),
        }
    }
}
