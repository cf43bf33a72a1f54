//! Console views of a query result
//!
//! - Table view: header columns plus projected rows, drawable as a text grid
//! - Raw view: pretty-printed JSON of the projected rows
//! - Plan view: the decoded execution plan
//!
//! Any decoding failure becomes an [`ErrorPanel`] instead of aborting the
//! render path.

use std::fmt;

use crate::codec::stringify;
use crate::error::{GqlError, Result};
use crate::result::{decode_response, ProjectedRow, QueryResult};
use crate::value::Value;

/// Language of user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl Locale {
    /// Parse a language tag ("en", "en-US", "zh-CN", "zh_CN", ...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag.split(['-', '_']).next().unwrap_or(tag);
        match lang.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "zh" => Some(Locale::ZhCn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Show tagged values as their exact wire strings
    pub preserve_raw: bool,
    /// Spaces per level in the raw and plan views
    pub indent: usize,
    pub locale: Locale,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preserve_raw: false,
            indent: 2,
            locale: Locale::En,
        }
    }
}

/// Which view to produce from a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Table,
    Raw,
    Plan,
}

/// Grid-ready form of a result
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<ProjectedRow>,
    pub latency: f64,
}

impl TableView {
    pub fn build(result: &QueryResult, options: &RenderOptions) -> Self {
        Self {
            columns: result.headers().to_vec(),
            rows: result.project(options.preserve_raw),
            latency: result.latency(),
        }
    }

    /// Bordered text grid. Empty when there are no columns.
    pub fn to_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.cells().map(|(_, cell)| cell_text(cell)).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for line in &body {
            for (width, text) in widths.iter_mut().zip(line) {
                *width = (*width).max(text.chars().count());
            }
        }

        let border = {
            let mut s = String::from("+");
            for width in &widths {
                s.push_str(&"-".repeat(width + 2));
                s.push('+');
            }
            s
        };

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        push_line(&mut out, &widths, self.columns.iter().map(String::as_str));
        out.push_str(&border);
        out.push('\n');
        for line in &body {
            push_line(&mut out, &widths, line.iter().map(String::as_str));
        }
        if !body.is_empty() {
            out.push_str(&border);
            out.push('\n');
        }
        out
    }

    /// Row count and latency line
    pub fn summary(&self, locale: Locale) -> String {
        match locale {
            Locale::En => format!("Got {} rows (time spent {} us)", self.rows.len(), self.latency),
            Locale::ZhCn => format!("共 {} 行 (耗时 {} us)", self.rows.len(), self.latency),
        }
    }
}

fn push_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    out.push('|');
    for (width, text) in widths.iter().zip(cells) {
        let pad = width - text.chars().count();
        out.push(' ');
        out.push_str(text);
        out.push_str(&" ".repeat(pad + 1));
        out.push('|');
    }
    out.push('\n');
}

/// Display text for one cell
///
/// Strings verbatim (newlines escaped), big numbers as their digits, a
/// missing cell as empty, anything nested as compact JSON.
pub fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None => String::new(),
        Some(Value::String(s)) => s.replace('\n', "\\n"),
        Some(Value::Big(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Pretty JSON of the projected rows
pub fn raw_view(result: &QueryResult, options: &RenderOptions) -> Result<String> {
    stringify(&result.project(options.preserve_raw), Some(options.indent))
}

/// Localized replacement for a result panel that could not be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub code: &'static str,
    pub message: String,
}

impl ErrorPanel {
    pub fn new(err: &GqlError, locale: Locale) -> Self {
        let message = match (err, locale) {
            (GqlError::Server { message, .. }, Locale::En) => format!("Query failed: {}", message),
            (GqlError::Server { message, .. }, Locale::ZhCn) => format!("查询失败: {}", message),
            (e, Locale::En) if e.is_payload_error() => {
                "The result payload is malformed and cannot be displayed".to_string()
            }
            (e, Locale::ZhCn) if e.is_payload_error() => "结果数据格式错误，无法显示".to_string(),
            (_, Locale::En) => format!("Unable to render result: {}", err),
            (_, Locale::ZhCn) => format!("无法渲染结果: {}", err),
        };

        Self {
            code: err.code(),
            message,
        }
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Decode a response body and produce the requested view
pub fn render(body: &str, view: View, options: &RenderOptions) -> std::result::Result<String, ErrorPanel> {
    let panel = |err: GqlError| {
        tracing::debug!(code = err.code(), error = %err, "showing error panel");
        ErrorPanel::new(&err, options.locale)
    };

    let result = decode_response(body).map_err(panel)?;

    match view {
        View::Table => {
            let table = TableView::build(&result, options);
            Ok(format!("{}{}", table.to_text(), table.summary(options.locale)))
        }
        View::Raw => raw_view(&result, options).map_err(panel),
        View::Plan => match result.plan() {
            Some(plan) => {
                let plan = plan.map_err(panel)?;
                stringify(&plan, Some(options.indent)).map_err(panel)
            }
            None => Ok(match options.locale {
                Locale::En => "No execution plan in this result".to_string(),
                Locale::ZhCn => "该结果没有执行计划".to_string(),
            }),
        },
    }
}
