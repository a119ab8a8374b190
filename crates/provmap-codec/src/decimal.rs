//! Decimal codec
//!
//! Wire form is a plain base-10 literal: optional sign, digits, optional
//! fractional part. No exponents, no thousands separators, no underscores.
//! Values are arbitrary-precision [`bigdecimal::BigDecimal`]s, so literals of
//! any length decode exactly and no binary floating-point rounding is ever
//! introduced.

use std::str::FromStr;

use bigdecimal::{BigDecimal as Decimal, Zero};

use crate::error::{CodecError, CodecResult};
use crate::{ScalarCodec, ScalarKind};

/// Codec marker for [`Decimal`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec;

impl ScalarCodec for DecimalCodec {
    type Value = Decimal;

    const KIND: ScalarKind = ScalarKind::Decimal;

    fn encode(value: &Decimal) -> String {
        encode(value)
    }

    fn decode(wire: &str) -> CodecResult<Decimal> {
        decode(wire)
    }

    fn semantically_equal(a: &Decimal, b: &Decimal) -> bool {
        semantically_equal(a, b)
    }
}

/// Encode in canonical form: trailing fractional zeros removed, no `-0`,
/// never in exponent notation
#[must_use]
pub fn encode(value: &Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let (mantissa, scale) = value.normalized().into_bigint_and_exponent();
    let text = mantissa.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };
    let shift = usize::try_from(scale.unsigned_abs()).unwrap_or(usize::MAX);
    if scale <= 0 {
        return format!("{sign}{digits}{}", "0".repeat(shift));
    }
    match digits.len().checked_sub(shift) {
        Some(0) => format!("{sign}0.{digits}"),
        Some(split) => format!("{sign}{}.{}", &digits[..split], &digits[split..]),
        None => format!("{sign}0.{}{digits}", "0".repeat(shift - digits.len())),
    }
}

/// Decode a decimal literal
///
/// # Errors
/// Returns [`CodecError::InvalidDecimal`] if the text is not an
/// optionally-signed, optionally-fractional base-10 literal.
pub fn decode(wire: &str) -> CodecResult<Decimal> {
    let literal = check_literal(wire).map_err(|reason| CodecError::invalid_decimal(wire, reason))?;
    let sign = if literal.negative { "-" } else { "" };
    let body = match literal.frac {
        Some(frac) => format!("{sign}{}.{frac}", or_zero(literal.int)),
        None => format!("{sign}{}", literal.int),
    };
    Decimal::from_str(&body).map_err(|e| CodecError::invalid_decimal(wire, e.to_string()))
}

struct Literal<'a> {
    negative: bool,
    int: &'a str,
    frac: Option<&'a str>,
}

fn or_zero(digits: &str) -> &str {
    if digits.is_empty() {
        "0"
    } else {
        digits
    }
}

fn check_literal(wire: &str) -> Result<Literal<'_>, &'static str> {
    let (negative, unsigned) = match wire.as_bytes().first() {
        Some(b'-') => (true, &wire[1..]),
        Some(b'+') => (false, &wire[1..]),
        _ => (false, wire),
    };
    if unsigned.is_empty() {
        return Err("empty literal");
    }

    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    if !int.bytes().all(|b| b.is_ascii_digit()) {
        return Err("unexpected character in integer part");
    }
    match frac {
        Some("") => Err("missing fractional digits"),
        Some(digits) if !digits.bytes().all(|b| b.is_ascii_digit()) => {
            Err("unexpected character in fractional part")
        }
        _ => Ok(Literal { negative, int, frac }),
    }
}

/// Compare two decimals numerically (`1.50` equals `1.5`)
#[inline]
#[must_use]
pub fn semantically_equal(a: &Decimal, b: &Decimal) -> bool {
    a == b
}

/// Parse a decimal from the shortest round-trip text of a float
///
/// Used when a plain-side field carries a binary float.
///
/// # Errors
/// Returns [`CodecError::InvalidDecimal`] for NaN and infinities.
pub fn from_f64(value: f64) -> CodecResult<Decimal> {
    let text = value.to_string();
    if !value.is_finite() {
        return Err(CodecError::invalid_decimal(text, "not a finite number"));
    }
    Decimal::from_str(&text).map_err(|e| CodecError::invalid_decimal(text, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_literals() {
        assert_eq!(decode("42").unwrap(), Decimal::from(42));
        assert_eq!(decode("-3.25").unwrap(), Decimal::from(-325) / Decimal::from(100));
        assert_eq!(decode("+0.5").unwrap(), Decimal::from(5) / Decimal::from(10));
        assert_eq!(decode(".5").unwrap(), decode("0.5").unwrap());
        assert_eq!(decode("007").unwrap(), Decimal::from(7));
    }

    #[test]
    fn decode_rejects_malformed() {
        for bad in ["", "-", "1e5", "1,000", "1_000", "1.", "1.2.3", "abc", " 1", "0x10"] {
            let err = decode(bad).unwrap_err();
            assert!(
                matches!(err, CodecError::InvalidDecimal { .. }),
                "expected InvalidDecimal for {bad:?}"
            );
        }
    }

    #[test]
    fn decode_keeps_full_precision() {
        let value = decode("0.1000000000000000000000000001").unwrap();
        assert_eq!(encode(&value), "0.1000000000000000000000000001");
    }

    #[test]
    fn decode_beyond_machine_precision() {
        let wide = "123456789012345678901234567890.123456789012345678901234567890";
        let value = decode(wide).unwrap();
        assert_eq!(encode(&value), wide);
        assert_eq!(decode(&encode(&value)).unwrap(), value);

        let one = decode("1.00000000000000000000000000000").unwrap();
        assert_eq!(one, Decimal::from(1));
        assert_eq!(encode(&one), "1");

        let big = decode("-123456789012345678901234567890").unwrap();
        assert_eq!(encode(&big), "-123456789012345678901234567890");
    }

    #[test]
    fn encode_never_uses_exponent() {
        assert_eq!(encode(&decode("1000000000000000000000").unwrap()), "1000000000000000000000");
        assert_eq!(encode(&decode("0.0000000000000000000001").unwrap()), "0.0000000000000000000001");
        assert_eq!(encode(&decode("-0.050").unwrap()), "-0.05");
        assert_eq!(encode(&decode("12.340").unwrap()), "12.34");
    }

    #[test]
    fn encode_is_canonical() {
        assert_eq!(encode(&decode("1.500").unwrap()), "1.5");
        assert_eq!(encode(&decode("-0.0").unwrap()), "0");
        assert_eq!(encode(&decode("10").unwrap()), "10");
    }

    #[test]
    fn semantic_equality_is_numeric() {
        assert!(semantically_equal(&decode("1.5").unwrap(), &decode("1.50").unwrap()));
        assert!(!semantically_equal(&decode("1.5").unwrap(), &decode("1.51").unwrap()));
    }

    #[test]
    fn float_conversion_uses_shortest_text() {
        assert_eq!(encode(&from_f64(0.1).unwrap()), "0.1");
        assert_eq!(encode(&from_f64(1e21).unwrap()), "1000000000000000000000");
        assert!(from_f64(f64::NAN).is_err());
        assert!(from_f64(f64::INFINITY).is_err());
    }
}
