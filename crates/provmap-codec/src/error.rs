//! Error types for scalar codecs
//!
//! Every decode failure names the scalar kind and carries the raw wire text
//! that could not be decoded.

use crate::ScalarKind;

/// Errors raised while decoding or validating a scalar wire string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Wire text is not a valid duration literal
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration {
        /// Raw wire text
        input: String,
        /// What went wrong
        reason: String,
    },

    /// Wire text is not a valid decimal literal
    #[error("invalid decimal {input:?}: {reason}")]
    InvalidDecimal {
        /// Raw wire text
        input: String,
        /// What went wrong
        reason: String,
    },

    /// Wire text is not syntactically valid JSON
    #[error("invalid JSON {input:?}: {reason}")]
    InvalidJson {
        /// Raw wire text
        input: String,
        /// Parser message
        reason: String,
    },

    /// A header line is malformed, or a header added to a block would not
    /// survive encoding
    #[error("invalid header line {line:?} in {input:?}: {reason}")]
    InvalidHeaderLine {
        /// Raw wire text of the whole block
        input: String,
        /// Offending line
        line: String,
        /// What went wrong
        reason: String,
    },

    /// No codec registered under this name
    #[error("no codec registered for scalar kind: '{0}'")]
    UnknownCodec(String),
}

impl CodecError {
    /// Create invalid duration error
    pub fn invalid_duration(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid decimal error
    pub fn invalid_decimal(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDecimal {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid JSON error
    pub fn invalid_json(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidJson {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create invalid header line error
    pub fn invalid_header_line(
        input: impl Into<String>,
        line: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidHeaderLine {
            input: input.into(),
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Scalar kind that produced this error, if any
    #[must_use]
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            Self::InvalidDuration { .. } => Some(ScalarKind::Duration),
            Self::InvalidDecimal { .. } => Some(ScalarKind::Decimal),
            Self::InvalidJson { .. } => Some(ScalarKind::RawJson),
            Self::InvalidHeaderLine { .. } => Some(ScalarKind::HeaderBlock),
            Self::UnknownCodec(_) => None,
        }
    }

    /// Raw wire text that failed to decode
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidDuration { input, .. }
            | Self::InvalidDecimal { input, .. }
            | Self::InvalidJson { input, .. }
            | Self::InvalidHeaderLine { input, .. } => input,
            Self::UnknownCodec(name) => name,
        }
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_error_display() {
        let err = CodecError::invalid_duration("1d", "unknown unit \"d\"");
        assert_eq!(err.to_string(), "invalid duration \"1d\": unknown unit \"d\"");
        assert_eq!(err.kind(), Some(ScalarKind::Duration));
        assert_eq!(err.input(), "1d");
    }

    #[test]
    fn header_error_kind() {
        let err = CodecError::invalid_header_line("nope", "nope", "missing ':'");
        assert_eq!(err.kind(), Some(ScalarKind::HeaderBlock));
    }

    #[test]
    fn unknown_codec_has_no_kind() {
        let err = CodecError::UnknownCodec("yaml".to_string());
        assert!(err.kind().is_none());
        assert_eq!(err.to_string(), "no codec registered for scalar kind: 'yaml'");
    }
}
