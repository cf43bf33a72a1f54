//! Tagged-value unwrapping
//!
//! Query results wrap typed property values as `{raw, value}` pairs (see
//! [`Value::Tagged`]). Rendering wants plain values, so [`unwrap`] strips
//! every wrapper in a tree.

use crate::value::Value;

/// Recursively replace every [`Value::Tagged`] in `node`.
///
/// With `preserve_raw` a tagged value becomes its exact wire string (a
/// non-string `raw` is given as its JSON text); otherwise it becomes its (recursively unwrapped) decoded value. Arrays
/// keep element order, objects keep key order, big numbers and scalars are
/// returned unchanged. The output contains no tagged values, so unwrapping
/// twice is the same as unwrapping once.
pub fn unwrap(node: &Value, preserve_raw: bool) -> Value {
    match node {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| unwrap(item, preserve_raw))
                .collect(),
        ),
        Value::Tagged(tagged) => {
            if preserve_raw {
                Value::String(tagged.raw().into_owned())
            } else {
                unwrap(tagged.value(), preserve_raw)
            }
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), unwrap(item, preserve_raw)))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}
