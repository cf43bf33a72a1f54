//! studio-gql - result pipeline for the graph studio query console
//!
//! Turns a `/gql/exec` response body into render-ready values without
//! losing precision on 64-bit integers:
//!
//! 1. [`codec`] parses JSON, keeping out-of-range numbers as [`BigNumber`]
//!    and decoding `{raw, value}` wrappers into [`Value::Tagged`].
//! 2. [`tagged::unwrap`] strips the wrappers.
//! 3. [`result::project`] restricts each row to the header list.
//! 4. [`render`] builds the table, raw and plan views.
//!
//! ```
//! use studio_gql::{decode_response, stringify};
//!
//! let result = decode_response(
//!     r#"{"headers":["id"],"tables":[{"id":{"raw":"9223372036854775807","value":9223372036854775807}}]}"#,
//! ).unwrap();
//! let rows = result.project(false);
//! assert_eq!(stringify(&rows, None).unwrap(), r#"[{"id":9223372036854775807}]"#);
//! ```

pub mod codec;
pub mod error;
pub mod render;
pub mod result;
pub mod tagged;
pub mod value;

pub use codec::{parse, safe_parse, stringify};
pub use error::{GqlError, Result};
pub use result::{decode_response, project, project_with, ExecResponse, ProjectedRow, QueryResult, Row};
pub use tagged::unwrap;
pub use value::{BigNumber, Map, Tagged, Value, MAX_SAFE_INTEGER};
