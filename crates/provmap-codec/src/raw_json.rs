//! Raw JSON codec
//!
//! The wire form is an opaque string holding a JSON document. The text is
//! validated but never reformatted, so a stored document keeps its exact
//! original bytes. Equality is structural: key order and whitespace are
//! irrelevant, numbers compare by exact decimal value at any magnitude.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::{CodecError, CodecResult};
use crate::{ScalarCodec, ScalarKind};

/// A syntactically valid JSON document, kept byte-for-byte
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawJson(String);

impl RawJson {
    /// Validate and wrap a JSON document
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidJson`] if `text` is not valid JSON.
    pub fn new(text: impl Into<String>) -> CodecResult<Self> {
        let text = text.into();
        validate(&text)?;
        Ok(Self(text))
    }

    /// Original document text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the original document text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse into a JSON value tree
    ///
    /// # Errors
    /// Only fails if the document was constructed without validation.
    pub fn to_value(&self) -> CodecResult<Value> {
        serde_json::from_str(&self.0).map_err(|e| CodecError::invalid_json(&self.0, e.to_string()))
    }
}

impl Display for RawJson {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RawJson {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::new(text).map_err(serde::de::Error::custom)
    }
}

/// Codec marker for [`RawJson`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJsonCodec;

impl ScalarCodec for RawJsonCodec {
    type Value = RawJson;

    const KIND: ScalarKind = ScalarKind::RawJson;

    fn encode(value: &RawJson) -> String {
        encode(value)
    }

    fn decode(wire: &str) -> CodecResult<RawJson> {
        decode(wire)
    }

    fn semantically_equal(a: &RawJson, b: &RawJson) -> bool {
        semantically_equal(a, b)
    }
}

/// Check that `text` is a single well-formed JSON document
///
/// Streams the input through the deserializer without building a value tree.
///
/// # Errors
/// Returns [`CodecError::InvalidJson`] with the parser message.
pub fn validate(text: &str) -> CodecResult<()> {
    serde_json::from_str::<IgnoredAny>(text)
        .map(|_| ())
        .map_err(|e| CodecError::invalid_json(text, e.to_string()))
}

/// Encode returns the stored text unchanged
#[inline]
#[must_use]
pub fn encode(value: &RawJson) -> String {
    value.0.clone()
}

/// Decode validates the text and keeps it verbatim
///
/// # Errors
/// Returns [`CodecError::InvalidJson`] if the text is not valid JSON.
pub fn decode(wire: &str) -> CodecResult<RawJson> {
    RawJson::new(wire)
}

/// True only when both documents match structurally in full
#[must_use]
pub fn semantically_equal(a: &RawJson, b: &RawJson) -> bool {
    matches!(diff(a, b), Ok(JsonMatch::FullMatch))
}

/// Outcome of a structural comparison between two documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsonMatch {
    /// Same keys, same nesting, same scalar values
    FullMatch,
    /// The first document contains everything in the second, and more
    SupersetMatch,
    /// Documents differ
    NoMatch,
}

/// Structurally compare two documents
///
/// # Errors
/// Returns [`CodecError::InvalidJson`] if either document fails to parse.
pub fn diff(a: &RawJson, b: &RawJson) -> CodecResult<JsonMatch> {
    Ok(compare(&a.to_value()?, &b.to_value()?))
}

fn compare(a: &Value, b: &Value) -> JsonMatch {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let mut outcome = if left.len() > right.len() {
                JsonMatch::SupersetMatch
            } else {
                JsonMatch::FullMatch
            };
            for (key, expected) in right {
                let Some(actual) = left.get(key) else {
                    return JsonMatch::NoMatch;
                };
                outcome = outcome.max(compare(actual, expected));
                if outcome == JsonMatch::NoMatch {
                    break;
                }
            }
            outcome
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() < right.len() {
                return JsonMatch::NoMatch;
            }
            let mut outcome = if left.len() > right.len() {
                JsonMatch::SupersetMatch
            } else {
                JsonMatch::FullMatch
            };
            for (actual, expected) in left.iter().zip(right) {
                outcome = outcome.max(compare(actual, expected));
                if outcome == JsonMatch::NoMatch {
                    break;
                }
            }
            outcome
        }
        (Value::Number(left), Value::Number(right)) => {
            if numbers_equal(left, right) {
                JsonMatch::FullMatch
            } else {
                JsonMatch::NoMatch
            }
        }
        _ if a == b => JsonMatch::FullMatch,
        _ => JsonMatch::NoMatch,
    }
}

/// Numbers keep their literal text, so compare the exact values it spells
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (exact_value(a), exact_value(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Canonical `(mantissa, exponent)` of a JSON number literal
fn exact_value(n: &Number) -> Option<(bigdecimal::num_bigint::BigInt, i64)> {
    BigDecimal::from_str(&n.to_string())
        .ok()
        .map(|d| d.normalized().into_bigint_and_exponent())
}
