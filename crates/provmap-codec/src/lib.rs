//! provmap Scalar Codecs
//!
//! Encode, decode and semantic equality for scalar kinds that have no
//! native wire primitive.
//!
//! # Kinds
//!
//! - [`duration`]: `1h30m`, `-1.5s`, `250ms`; compared by value
//! - [`decimal`]: base-10 literals with exact arithmetic
//! - [`raw_json`]: JSON documents kept verbatim, compared structurally
//! - [`header_block`]: `Key: Value\r\n` lines as an ordered multimap
//!
//! Each kind has a typed [`ScalarCodec`] and is reachable by name through the
//! read-only [`registry::global`] table.
//!
//! # Laws
//!
//! - `decode(encode(v)) == v` for every valid value
//! - textually equal wire strings are always semantically equal
//!
//! # Example
//!
//! ```rust
//! use provmap_codec::{duration, registry};
//!
//! let a = duration::decode("1h").unwrap();
//! let b = duration::decode("60m").unwrap();
//! assert!(duration::semantically_equal(&a, &b));
//!
//! assert!(registry::global().semantically_equal("raw_json", "{\"a\": 1}", "{\"a\":1}").unwrap());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod decimal;
pub mod duration;
pub mod error;
pub mod header_block;
pub mod raw_json;
pub mod registry;

use std::fmt::{self, Display, Formatter};

pub use decimal::DecimalCodec;
pub use duration::{Duration, DurationCodec};
pub use error::{CodecError, CodecResult};
pub use header_block::{HeaderBlock, HeaderBlockCodec};
pub use raw_json::{JsonMatch, RawJson, RawJsonCodec};
pub use registry::{CodecRegistry, Wire, WireCodec};

/// Arbitrary-precision decimal value carried by the decimal codec
pub use bigdecimal::BigDecimal as Decimal;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scalar kinds with a registered codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    /// Human duration literal
    Duration,
    /// Base-10 decimal literal
    Decimal,
    /// JSON document
    RawJson,
    /// `Key: Value` line block
    HeaderBlock,
}

impl ScalarKind {
    /// All built-in kinds
    pub const ALL: [Self; 4] = [
        Self::Duration,
        Self::Decimal,
        Self::RawJson,
        Self::HeaderBlock,
    ];

    /// Registry name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Decimal => "decimal",
            Self::RawJson => "raw_json",
            Self::HeaderBlock => "header_block",
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed codec for one scalar kind
///
/// # Laws
/// - `decode(&encode(v))` is value-equal to `v`
/// - `semantically_equal` holds for any two values decoded from equal text
pub trait ScalarCodec {
    /// Decoded value type
    type Value;

    /// Kind handled by this codec
    const KIND: ScalarKind;

    /// Encode to wire text
    fn encode(value: &Self::Value) -> String;

    /// Decode from wire text
    ///
    /// # Errors
    /// Returns the kind-specific [`CodecError`] variant with the raw text.
    fn decode(wire: &str) -> CodecResult<Self::Value>;

    /// Compare by meaning rather than spelling
    fn semantically_equal(a: &Self::Value, b: &Self::Value) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        let names: Vec<_> = ScalarKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["duration", "decimal", "raw_json", "header_block"]);
    }

    #[test]
    fn codec_kinds_match_markers() {
        assert_eq!(DurationCodec::KIND, ScalarKind::Duration);
        assert_eq!(DecimalCodec::KIND, ScalarKind::Decimal);
        assert_eq!(RawJsonCodec::KIND, ScalarKind::RawJson);
        assert_eq!(HeaderBlockCodec::KIND, ScalarKind::HeaderBlock);
    }
}
