//! Query results and row projection
//!
//! A `/gql/exec` response body is decoded once into a [`QueryResult`].
//! Rows are then projected onto the header list for the table and raw
//! views.
//!
//! # Wire format
//!
//! Either a bare result:
//!
//! ```json
//! {"headers": ["id"], "tables": [{"id": {"raw": "1", "value": 1}}], "latency": 812, "planDesc": ""}
//! ```
//!
//! or the same object wrapped in an envelope:
//!
//! ```json
//! {"code": 0, "message": "", "data": {"headers": ["id"], "tables": [], "timeCost": 812}}
//! ```

use serde::de::IgnoredAny;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::codec::safe_parse;
use crate::error::{GqlError, Result};
use crate::tagged::unwrap;
use crate::value::{Map, Value};

/// One result row: header name to cell value
pub type Row = Map;

/// Decoded result of one query execution. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    tables: Vec<Row>,
    #[serde(default, alias = "timeCost")]
    latency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plan_desc: Option<String>,
}

impl QueryResult {
    pub fn new(headers: Vec<String>, tables: Vec<Row>, latency: f64, plan_desc: Option<String>) -> Self {
        Self {
            headers,
            tables,
            latency,
            plan_desc,
        }
    }

    /// Column order; the authoritative key set for projection
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn tables(&self) -> &[Row] {
        &self.tables
    }

    /// Server-reported execution time
    pub fn latency(&self) -> f64 {
        self.latency
    }

    pub fn plan_desc(&self) -> Option<&str> {
        self.plan_desc.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Decode the execution plan embedded as a JSON string.
    ///
    /// `None` when the result carries no plan. A malformed plan is returned
    /// as an error and never affects the rows.
    pub fn plan(&self) -> Option<Result<Value>> {
        self.plan_desc
            .as_deref()
            .filter(|plan| !plan.trim().is_empty())
            .map(safe_parse::<Value>)
    }

    /// Rows restricted to [`headers`](Self::headers), tagged values unwrapped
    pub fn project(&self, preserve_raw: bool) -> Vec<ProjectedRow> {
        project_with(&self.headers, &self.tables, preserve_raw)
    }
}

/// Row restricted and ordered to a header list.
///
/// Holds exactly one cell per header, in header order. A header the source
/// row lacked maps to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRow {
    cells: Vec<(String, Option<Value>)>,
}

impl ProjectedRow {
    /// Cell for `header`; `None` when missing from the source row
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .and_then(|(_, cell)| cell.as_ref())
    }

    pub fn contains_column(&self, header: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == header)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.cells
            .iter()
            .map(|(name, cell)| (name.as_str(), cell.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ProjectedRow {
    /// Object of present cells; missing cells are omitted. A repeated
    /// header is written once, as its first cell.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (i, (name, cell)) in self.cells.iter().enumerate() {
            if self.cells[..i].iter().any(|(seen, _)| seen == name) {
                continue;
            }
            if let Some(value) = cell {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}

/// Project `rows` onto `headers`, unwrapping tagged values.
pub fn project<S: AsRef<str>>(headers: &[S], rows: &[Row]) -> Vec<ProjectedRow> {
    project_with(headers, rows, false)
}

/// [`project`] with control over tagged values: `preserve_raw` keeps their
/// exact wire strings.
///
/// Output row count and order match `rows`; every output row has one cell
/// per header in header order. Keys outside `headers` are dropped.
pub fn project_with<S: AsRef<str>>(headers: &[S], rows: &[Row], preserve_raw: bool) -> Vec<ProjectedRow> {
    tracing::trace!(
        rows = rows.len(),
        columns = headers.len(),
        preserve_raw,
        "projecting result rows"
    );

    rows.iter()
        .map(|row| ProjectedRow {
            cells: headers
                .iter()
                .map(|header| {
                    let header = header.as_ref();
                    let cell = row.get(header).map(|value| unwrap(value, preserve_raw));
                    (header.to_string(), cell)
                })
                .collect(),
        })
        .collect()
}

/// `{code, message, data}` envelope around a result
#[derive(Debug, Clone, Deserialize)]
pub struct ExecResponse {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<QueryResult>,
}

impl ExecResponse {
    /// `data` for code 0 (empty result when absent), a server error otherwise
    pub fn into_result(self) -> Result<QueryResult> {
        if self.code != 0 {
            let message = self.message.unwrap_or_default();
            tracing::debug!(code = self.code, reason = %message, "query rejected by server");
            return Err(GqlError::Server {
                code: self.code,
                message,
            });
        }
        Ok(self.data.unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct EnvelopeHead {
    #[serde(default)]
    code: Option<i64>,
}

/// Serde's derived struct visitors also accept arrays, so a body such as
/// `[5]` has to be turned away before it is read as a result.
fn ensure_object(text: &str) -> Result<()> {
    if text.trim_start().starts_with('{') {
        return Ok(());
    }
    let _: IgnoredAny = safe_parse(text)?;
    Err(GqlError::Shape("response body is not a JSON object".to_string()))
}

/// Decode a `/gql/exec` response body, bare or enveloped.
///
/// Malformed text is a [`GqlError::Syntax`]; well-formed text that is not
/// an object, or whose members have the wrong types, is a
/// [`GqlError::Shape`].
pub fn decode_response(text: &str) -> Result<QueryResult> {
    ensure_object(text)?;
    let head: EnvelopeHead = safe_parse(text)?;

    if head.code.is_some() {
        safe_parse::<ExecResponse>(text)?.into_result()
    } else {
        safe_parse(text)
    }
}
