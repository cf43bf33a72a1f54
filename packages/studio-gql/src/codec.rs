//! Big-number-safe JSON codec
//!
//! `parse` and `stringify` never route numbers through `f64` unless the
//! double holds them exactly (see [`crate::value`]). `safe_parse` is the
//! entry point for foreign text such as plan payloads embedded in a result.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{GqlError, Result};
use crate::value::Value;

/// Widest indent `stringify` honours, as JSON.stringify does
pub const MAX_INDENT: usize = 10;

/// Parse JSON text into a [`Value`] tree.
///
/// Fails with [`GqlError::Syntax`] when the text is not well-formed JSON.
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize to JSON text.
///
/// `None` or `Some(0)` produces compact output, `Some(n)` indents each
/// level by `n` spaces (capped at [`MAX_INDENT`]).
pub fn stringify<T: Serialize + ?Sized>(value: &T, indent: Option<usize>) -> Result<String> {
    let mut buf = Vec::with_capacity(128);

    match indent.map(|width| width.min(MAX_INDENT)) {
        Some(width) if width > 0 => {
            let pad = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(pad.as_bytes());
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            value
                .serialize(&mut ser)
                .map_err(|e| GqlError::Serialize(e.to_string()))?;
        }
        _ => {
            let mut ser = Serializer::new(&mut buf);
            value
                .serialize(&mut ser)
                .map_err(|e| GqlError::Serialize(e.to_string()))?;
        }
    }

    String::from_utf8(buf).map_err(|e| GqlError::Serialize(e.to_string()))
}

/// Parse JSON text into any deserializable type without panicking.
///
/// Malformed text yields [`GqlError::Syntax`]; well-formed text of the wrong
/// shape yields [`GqlError::Shape`]. Use this for any payload that did not
/// come straight from the result decoder.
pub fn safe_parse<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        let err = GqlError::from(e);
        tracing::debug!(code = err.code(), error = %err, "rejected JSON payload");
        err
    })
}
