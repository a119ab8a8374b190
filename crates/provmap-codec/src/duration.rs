//! Duration codec
//!
//! Wire form is a human duration literal: an optional sign followed by a
//! sum of `<number><unit>` quantities, e.g. `1h30m`, `-1.5s`, `300ms`.
//! Recognised units are `ns`, `us` (also `µs`/`μs`), `ms`, `s`, `m`, `h`.
//! A bare `0` is accepted without a unit.
//!
//! Values are signed 64-bit nanosecond counts. Equality is on the parsed
//! value, so `1h` and `60m` are semantically equal.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal as Decimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, CodecResult};
use crate::{ScalarCodec, ScalarKind};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Signed span of time with nanosecond resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    /// Zero-length duration
    pub const ZERO: Self = Self { nanos: 0 };
    /// One nanosecond
    pub const NANOSECOND: Self = Self { nanos: 1 };
    /// One microsecond
    pub const MICROSECOND: Self = Self { nanos: 1_000 };
    /// One millisecond
    pub const MILLISECOND: Self = Self { nanos: 1_000_000 };
    /// One second
    pub const SECOND: Self = Self { nanos: NANOS_PER_SECOND };
    /// One minute
    pub const MINUTE: Self = Self { nanos: 60 * NANOS_PER_SECOND };
    /// One hour
    pub const HOUR: Self = Self { nanos: 3_600 * NANOS_PER_SECOND };

    /// Create from a nanosecond count
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Create from whole seconds, saturating at the representable range
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs.saturating_mul(NANOS_PER_SECOND),
        }
    }

    /// Nanosecond count
    #[inline]
    #[must_use]
    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Check if negative
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    /// Convert an arbitrary-precision count of seconds into a duration
    ///
    /// Rounds to the nearest nanosecond, halves away from zero.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidDuration`] if the result does not fit.
    pub fn from_seconds(seconds: &Decimal) -> CodecResult<Self> {
        let nanos = (seconds * &Decimal::from(NANOS_PER_SECOND))
            .with_scale_round(0, RoundingMode::HalfUp)
            .to_i64()
            .ok_or_else(|| {
                CodecError::invalid_duration(crate::decimal::encode(seconds), "out of range")
            })?;
        Ok(Self { nanos })
    }

    /// Exact count of seconds as a decimal
    #[must_use]
    pub fn as_seconds(&self) -> Decimal {
        Decimal::new(BigInt::from(self.nanos), 9).normalized()
    }

    /// Convert to a standard library duration (non-negative only)
    #[must_use]
    pub fn to_std(&self) -> Option<std::time::Duration> {
        u64::try_from(self.nanos)
            .ok()
            .map(std::time::Duration::from_nanos)
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Duration {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(self))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = String::deserialize(deserializer)?;
        decode(&wire).map_err(serde::de::Error::custom)
    }
}

/// Codec marker for [`Duration`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationCodec;

impl ScalarCodec for DurationCodec {
    type Value = Duration;

    const KIND: ScalarKind = ScalarKind::Duration;

    fn encode(value: &Duration) -> String {
        encode(value)
    }

    fn decode(wire: &str) -> CodecResult<Duration> {
        decode(wire)
    }

    fn semantically_equal(a: &Duration, b: &Duration) -> bool {
        semantically_equal(a, b)
    }
}

/// Encode a duration in canonical form (`1h30m0s`, `1.5s`, `250ms`, `0s`)
#[must_use]
pub fn encode(value: &Duration) -> String {
    let magnitude = value.nanos.unsigned_abs();
    let sign = if value.is_negative() { "-" } else { "" };

    if magnitude < 1_000_000_000 {
        let body = match magnitude {
            0 => return "0s".to_string(),
            m if m < 1_000 => format!("{m}ns"),
            m if m < 1_000_000 => {
                let (frac, int) = split_fraction(m, 3);
                format!("{int}{frac}µs")
            }
            m => {
                let (frac, int) = split_fraction(m, 6);
                format!("{int}{frac}ms")
            }
        };
        return format!("{sign}{body}");
    }

    let (frac, total_secs) = split_fraction(magnitude, 9);
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    if hours > 0 {
        format!("{sign}{hours}h{mins}m{secs}{frac}s")
    } else if total_mins > 0 {
        format!("{sign}{mins}m{secs}{frac}s")
    } else {
        format!("{sign}{secs}{frac}s")
    }
}

/// Split `value` at `precision` decimal places, returning the trimmed
/// fractional suffix (with leading `.`, or empty) and the integral part.
fn split_fraction(value: u64, precision: u32) -> (String, u64) {
    let pow = 10u64.pow(precision);
    let frac = value % pow;
    let int = value / pow;
    if frac == 0 {
        return (String::new(), int);
    }
    let digits = format!("{frac:0width$}", width = precision as usize);
    (format!(".{}", digits.trim_end_matches('0')), int)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "\u{00b5}s" | "\u{03bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

/// Decode a duration literal
///
/// # Errors
/// Returns [`CodecError::InvalidDuration`] on empty input, a quantity
/// without digits, a missing or unknown unit, or overflow.
pub fn decode(wire: &str) -> CodecResult<Duration> {
    let fail = |reason: String| CodecError::invalid_duration(wire, reason);

    let (negative, mut rest) = match wire.as_bytes().first() {
        Some(b'-') => (true, &wire[1..]),
        Some(b'+') => (false, &wire[1..]),
        _ => (false, wire),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(fail("empty duration".to_string()));
    }

    let limit: u128 = if negative {
        1u128 << 63
    } else {
        i64::MAX as u128
    };
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_digits = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_digits = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(fail("expected a number".to_string()));
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(fail("missing unit".to_string()));
        }
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        let scale = unit_nanos(unit).ok_or_else(|| fail(format!("unknown unit {unit:?}")))?;

        let whole = parse_digits(int_digits).ok_or_else(|| fail("overflow".to_string()))?;
        let mut quantity = whole
            .checked_mul(scale)
            .ok_or_else(|| fail("overflow".to_string()))?;

        if !frac_digits.is_empty() {
            // Digits past 18 are consumed but cannot contribute at nanosecond resolution.
            let significant = &frac_digits[..frac_digits.len().min(18)];
            let numerator = parse_digits(significant).unwrap_or(0);
            let denominator = 10u128.pow(u32::try_from(significant.len()).unwrap_or(18));
            quantity += numerator * scale / denominator;
        }

        total = total
            .checked_add(quantity)
            .filter(|t| *t <= limit)
            .ok_or_else(|| fail("overflow".to_string()))?;
    }

    let signed = i128::try_from(total).map_err(|_| fail("overflow".to_string()))?;
    let signed = if negative { -signed } else { signed };
    let nanos = i64::try_from(signed).map_err(|_| fail("overflow".to_string()))?;
    Ok(Duration { nanos })
}

fn parse_digits(digits: &str) -> Option<u128> {
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse::<u128>().ok()
}

/// Compare two durations by value
#[inline]
#[must_use]
pub fn semantically_equal(a: &Duration, b: &Duration) -> bool {
    a.nanos == b.nanos
}
