//! Value tree for GQL query results
//!
//! Mirrors a JSON document with two additions:
//!
//! - Numbers a double cannot hold exactly are kept as [`BigNumber`], which
//!   carries every digit from the wire. 64-bit vertex ids survive a
//!   parse/stringify round trip unchanged. Exponents are written in
//!   serde_json's normal form, so `1e400` comes back as `1e+400`.
//! - Objects with both a `raw` and a `value` member are decoded into
//!   [`Value::Tagged`] once, while parsing. Later stages match on the
//!   variant instead of sniffing object keys.
//!
//! # Number classification
//!
//! | literal                                   | variant        |
//! |-------------------------------------------|----------------|
//! | integer within ±(2^53 − 1)                | `Int`          |
//! | integer outside that range                | `Big`          |
//! | fraction/exponent, ≤ 15 significant digits | `Float`        |
//! | fraction/exponent, more digits or overflow | `Big`          |
//! | non-zero digits that underflow to `0.0`    | `Big`          |

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

use crate::error::{GqlError, Result};

/// Largest integer a double represents exactly (2^53 − 1)
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Decimal digits a double always round-trips
const MAX_EXACT_DIGITS: usize = 15;

/// Insertion-ordered object map
pub type Map = IndexMap<String, Value>;

/// Exact JSON number literal that does not fit a double losslessly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigNumber(String);

impl BigNumber {
    /// Number text; digits as on the wire, exponent in serde_json's form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_integer(&self) -> bool {
        !self.0.contains(['.', 'e', 'E'])
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    /// Integer value, if it is an integer that fits `i128`
    pub fn to_i128(&self) -> Option<i128> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Nearest double (lossy)
    pub fn to_f64(&self) -> f64 {
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for BigNumber {
    type Err = GqlError;

    /// Accepts exactly the JSON number grammar.
    fn from_str(s: &str) -> Result<Self> {
        serde_json::Number::from_str(s).map_err(|_| GqlError::InvalidNumber(s.to_string()))?;
        Ok(BigNumber(s.to_string()))
    }
}

impl From<i128> for BigNumber {
    fn from(n: i128) -> Self {
        BigNumber(n.to_string())
    }
}

impl From<u64> for BigNumber {
    fn from(n: u64) -> Self {
        BigNumber(n.to_string())
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BigNumber {
    /// With serde_json this writes the stored digits verbatim.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.0).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

/// Typed property value: exact wire text plus its decoded form.
///
/// Keeps every member of the wire object in order, so members other than
/// `raw` and `value` (a type name, say) are written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    fields: Map,
}

static NULL: Value = Value::Null;

impl Tagged {
    pub fn new(raw: impl Into<String>, value: Value) -> Self {
        let mut fields = Map::with_capacity(2);
        fields.insert("raw".to_string(), Value::String(raw.into()));
        fields.insert("value".to_string(), value);
        Self { fields }
    }

    /// Wire text of the value. A non-string `raw` is given as compact JSON.
    pub fn raw(&self) -> Cow<'_, str> {
        match self.fields.get("raw") {
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed(""),
        }
    }

    pub fn value(&self) -> &Value {
        self.fields.get("value").unwrap_or(&NULL)
    }

    /// All members, `raw` and `value` included
    pub fn fields(&self) -> &Map {
        &self.fields
    }
}

impl Serialize for Tagged {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(&self.fields)
    }
}

/// Parsed JSON value with big-number and tagged-value support
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Integer within ±[`MAX_SAFE_INTEGER`]
    Int(i64),
    Float(f64),
    Big(BigNumber),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Tagged(Box<Tagged>),
}

impl Value {
    /// Integer as `Int` when safe, `Big` otherwise
    pub fn from_integer(n: i128) -> Self {
        if n.unsigned_abs() <= MAX_SAFE_INTEGER as u128 {
            Value::Int(n as i64)
        } else {
            Value::Big(BigNumber::from(n))
        }
    }

    pub fn tagged(raw: impl Into<String>, value: Value) -> Self {
        Value::Tagged(Box::new(Tagged::new(raw, value)))
    }

    /// Classify a JSON number literal that serde_json already validated.
    pub(crate) fn from_number_literal(literal: &str) -> Self {
        if !literal.contains(['.', 'e', 'E']) {
            return match literal.parse::<i64>() {
                Ok(n) if n.unsigned_abs() <= MAX_SAFE_INTEGER as u64 => Value::Int(n),
                _ => Value::Big(BigNumber(literal.to_string())),
            };
        }

        let digits = significant_digits(literal);
        match literal.parse::<f64>() {
            // 0.0 from non-zero digits is an underflow, not a zero
            Ok(f) if f == 0.0 && digits > 0 => Value::Big(BigNumber(literal.to_string())),
            Ok(f) if f.is_finite() && digits <= MAX_EXACT_DIGITS => Value::Float(f),
            _ => Value::Big(BigNumber(literal.to_string())),
        }
    }

    /// Object member lookup; `None` for non-objects
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Big(n) => n.to_i128().and_then(|n| i64::try_from(n).ok()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Big(_) => "bignumber",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Tagged(_) => "tagged",
        }
    }
}

/// Count of significant mantissa digits, ignoring sign, point and
/// leading/trailing zeros.
fn significant_digits(literal: &str) -> usize {
    let mantissa = literal.split(['e', 'E']).next().unwrap_or(literal);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

/// Any object carrying both a `raw` and a `value` member
fn is_tagged_shape(map: &serde_json::Map<String, serde_json::Value>) -> bool {
    map.contains_key("raw") && map.contains_key("value")
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // Display of an arbitrary_precision number is its literal text
            serde_json::Value::Number(n) => Value::from_number_literal(&n.to_string()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let tagged = is_tagged_shape(&map);
                let fields: Map = map
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect();
                if tagged {
                    Value::Tagged(Box::new(Tagged { fields }))
                } else {
                    Value::Object(fields)
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_integer(n as i128)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigNumber> for Value {
    fn from(n: BigNumber) -> Self {
        Value::Big(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Big(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
            Value::Tagged(tagged) => tagged.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    /// Compact JSON
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
