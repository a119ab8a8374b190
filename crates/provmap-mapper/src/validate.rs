//! Attribute validators
//!
//! Helpers for schema code that holds attribute values as tri-state wire
//! text: check that a configured value decodes, and decide whether a planned
//! value differs from the prior one only in spelling.

use provmap_codec::{registry, CodecResult, ScalarKind};

use crate::tristate::TriState;

/// Check a configured attribute against its scalar kind
///
/// Unknown and null values are not checked.
///
/// # Errors
/// Returns the kind's decode error for malformed known text.
pub fn validate_attribute(kind: ScalarKind, value: &TriState<String>) -> CodecResult<()> {
    match value.as_known() {
        Some(wire) => registry::global().validate(kind.name(), wire),
        None => Ok(()),
    }
}

/// Check if the planned value only respells the prior one
///
/// True when both are known and semantically equal, or both are null.
/// Anything unknown, or text that does not decode, counts as a change.
#[must_use]
pub fn suppress_diff(kind: ScalarKind, prior: &TriState<String>, planned: &TriState<String>) -> bool {
    match (prior, planned) {
        (TriState::Null, TriState::Null) => true,
        (TriState::Known(a), TriState::Known(b)) => {
            a == b
                || registry::global()
                    .semantically_equal(kind.name(), a, b)
                    .unwrap_or(false)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(s: &str) -> TriState<String> {
        TriState::Known(s.to_string())
    }

    #[test]
    fn unknown_and_null_pass() {
        for kind in ScalarKind::ALL {
            assert!(validate_attribute(kind, &TriState::Unknown).is_ok());
            assert!(validate_attribute(kind, &TriState::Null).is_ok());
        }
    }

    #[test]
    fn known_text_is_decoded() {
        assert!(validate_attribute(ScalarKind::Duration, &known("1h30m")).is_ok());
        assert!(validate_attribute(ScalarKind::Duration, &known("1d")).is_err());
        assert!(validate_attribute(ScalarKind::Decimal, &known("1,000")).is_err());
        assert!(validate_attribute(ScalarKind::RawJson, &known("{\"a\": [1, 2]}")).is_ok());
        assert!(validate_attribute(ScalarKind::HeaderBlock, &known("nope")).is_err());
    }

    #[test]
    fn respelling_is_suppressed() {
        assert!(suppress_diff(ScalarKind::Duration, &known("1h"), &known("60m")));
        assert!(suppress_diff(ScalarKind::Decimal, &known("1.50"), &known("1.5")));
        assert!(suppress_diff(
            ScalarKind::RawJson,
            &known("{\"a\": \"b\"}"),
            &known("{\"a\":\"b\"}\n")
        ));
        assert!(suppress_diff(ScalarKind::Duration, &TriState::Null, &TriState::Null));
    }

    #[test]
    fn real_changes_are_kept() {
        assert!(!suppress_diff(ScalarKind::Duration, &known("1h"), &known("61m")));
        assert!(!suppress_diff(ScalarKind::RawJson, &known("{\"a\":\"b\"}"), &known("{\"a\":\"c\"}")));
        assert!(!suppress_diff(ScalarKind::Duration, &TriState::Unknown, &known("1h")));
        assert!(!suppress_diff(ScalarKind::Duration, &TriState::Null, &known("1h")));
        assert!(!suppress_diff(ScalarKind::Duration, &known("bad"), &known("worse")));
    }
}
