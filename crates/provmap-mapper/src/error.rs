//! Error types for record mapping
//!
//! Provides:
//! - [`MapErrorKind`]: what went wrong with one field
//! - [`FieldError`]: a kind plus the breadcrumb path where it happened
//! - [`MappingError`]: every field error from one top-level call

use std::fmt::{self, Display, Formatter};

use provmap_codec::CodecError;

/// What went wrong while converting one field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapErrorKind {
    /// A scalar codec rejected the wire text
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Source and destination kinds are incompatible
    #[error("type mismatch: cannot convert {src} into {dst}")]
    TypeMismatch {
        /// Source value kind
        src: &'static str,
        /// Destination field kind
        dst: &'static str,
    },

    /// A null value reached a field that has no null slot
    #[error("cannot assign null to required field")]
    CannotAssignNullToRequiredField,

    /// An unknown value reached a field that would be sent to the API
    #[error("cannot send unknown value")]
    CannotSendUnknownValue,

    /// The source record has no counterpart for a primary-key field
    #[error("missing primary key field '{field}' in {record}")]
    MissingPrimaryKeyField {
        /// Source record type
        record: &'static str,
        /// Source field name that was looked up
        field: &'static str,
    },

    /// The value kind cannot be handled by this field at all
    #[error("unsupported field kind: {kind}")]
    UnsupportedFieldKind {
        /// Offending kind
        kind: &'static str,
    },

    /// The record's field table breaks a directive rule
    #[error("invalid field directives on {record}: {reason}")]
    InvalidDirective {
        /// Record type
        record: &'static str,
        /// Broken rule
        reason: String,
    },
}

impl MapErrorKind {
    /// Create type mismatch
    #[inline]
    #[must_use]
    pub fn mismatch(src: &'static str, dst: &'static str) -> Self {
        Self::TypeMismatch { src, dst }
    }
}

/// One step of a field breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named record field
    Field(String),
    /// Position in a list or set
    Index(usize),
    /// Key in a map
    Key(String),
}

/// Breadcrumb from the top-level record to a field, e.g. `schedule[2].weekdays`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Empty path (the value itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path segments from the outermost record inwards
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Check if path is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Put `segment` in front of this path
    pub fn push_front(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

/// A field-level error with its location
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    path: FieldPath,
    kind: MapErrorKind,
}

impl FieldError {
    /// Error at the current value
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<MapErrorKind>) -> Self {
        Self {
            path: FieldPath::root(),
            kind: kind.into(),
        }
    }

    /// Location of the field
    #[inline]
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// What went wrong
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &MapErrorKind {
        &self.kind
    }

    /// Consume into the kind
    #[inline]
    #[must_use]
    pub fn into_kind(self) -> MapErrorKind {
        self.kind
    }

    /// Prefix the path with an enclosing segment
    #[must_use]
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.push_front(segment);
        self
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<MapErrorKind> for FieldError {
    fn from(kind: MapErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Errors collected while converting one value tree
pub type FieldErrors = Vec<FieldError>;

/// Single error at the current value
#[inline]
#[must_use]
pub fn leaf(kind: impl Into<MapErrorKind>) -> FieldErrors {
    vec![FieldError::new(kind)]
}

/// Prefix every error in `errors` with `segment`
#[must_use]
pub fn nest(errors: FieldErrors, segment: &PathSegment) -> FieldErrors {
    errors
        .into_iter()
        .map(|e| e.within(segment.clone()))
        .collect()
}

/// Aggregated result of one `copy_in`, `copy_out` or `mirror` call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", render(.errors))]
pub struct MappingError {
    errors: Vec<FieldError>,
}

fn render(errors: &[FieldError]) -> String {
    match errors {
        [single] => single.to_string(),
        many => {
            let lines: Vec<String> = many.iter().map(|e| format!("  {e}")).collect();
            format!("{} field errors:\n{}", many.len(), lines.join("\n"))
        }
    }
}

impl MappingError {
    /// Wrap collected field errors
    #[inline]
    #[must_use]
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Error for a single field
    #[inline]
    #[must_use]
    pub fn single(error: impl Into<FieldError>) -> Self {
        Self::new(vec![error.into()])
    }

    /// All field errors in the order they were found
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterate field errors
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of field errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if no errors were collected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error found
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Check if any error has the given kind discriminant
    #[must_use]
    pub fn contains(&self, predicate: impl Fn(&MapErrorKind) -> bool) -> bool {
        self.errors.iter().any(|e| predicate(e.kind()))
    }
}

impl IntoIterator for MappingError {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Result type alias for mapping operations
pub type MapResult<T> = Result<T, MappingError>;
