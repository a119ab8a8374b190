//! Dynamic values
//!
//! [`Dynamic`] is the shape-neutral form every field passes through between
//! a source record and a destination record. Records expose themselves as a
//! [`RecordView`]: field name to value, plus the primary-key marker of each
//! field.

use indexmap::IndexMap;
use provmap_codec::{Decimal, Duration, RawJson};

/// Field value detached from its static type
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    /// Tri-state unknown
    Unknown,
    /// Tri-state null or an absent optional slot
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Binary float
    Float(f64),
    /// Text
    Str(String),
    /// Duration
    Duration(Duration),
    /// Decimal
    Decimal(Decimal),
    /// JSON document
    Json(RawJson),
    /// Ordered collection
    List(Vec<Dynamic>),
    /// Unordered collection, in encounter order
    Set(Vec<Dynamic>),
    /// String-keyed mapping
    Map(IndexMap<String, Dynamic>),
    /// Nested record
    Record(RecordView),
}

impl Dynamic {
    /// Kind name used in error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Duration(_) => "duration",
            Self::Decimal(_) => "decimal",
            Self::Json(_) => "json",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    /// Check if unknown
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Check if null
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One field of a [`RecordView`]
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEntry {
    /// Field value
    pub value: Dynamic,
    /// Field carries the primary-key marker
    pub primary_key: bool,
}

/// A record flattened to its fields, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    record: &'static str,
    entries: IndexMap<&'static str, ViewEntry>,
}

impl RecordView {
    /// Create empty view for a record type
    #[inline]
    #[must_use]
    pub fn new(record: &'static str) -> Self {
        Self {
            record,
            entries: IndexMap::new(),
        }
    }

    /// Record type name
    #[inline]
    #[must_use]
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Add a field
    pub fn insert(&mut self, name: &'static str, value: Dynamic, primary_key: bool) {
        self.entries.insert(name, ViewEntry { value, primary_key });
    }

    /// Look up a field by exact (case-sensitive) name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ViewEntry> {
        self.entries.get(name)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ViewEntry)> {
        self.entries.iter().map(|(name, entry)| (*name, entry))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if view has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names that still hold an unknown value, primary key excluded
    #[must_use]
    pub fn unknown_fields(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.primary_key && entry.value.is_unknown())
            .map(|(name, _)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(Dynamic::Str("x".to_string()).kind_name(), "string");
        assert_eq!(Dynamic::Int(1).kind_name(), "int");
        assert_eq!(Dynamic::Record(RecordView::new("R")).kind_name(), "record");
    }

    #[test]
    fn view_lookup_is_case_sensitive() {
        let mut view = RecordView::new("Check");
        view.insert("name", Dynamic::Str("api".to_string()), false);
        assert!(view.get("name").is_some());
        assert!(view.get("Name").is_none());
        assert_eq!(view.record(), "Check");
    }

    #[test]
    fn unknown_fields_skip_identity() {
        let mut view = RecordView::new("Check");
        view.insert("id", Dynamic::Unknown, true);
        view.insert("name", Dynamic::Unknown, false);
        view.insert("muted", Dynamic::Bool(false), false);
        assert_eq!(view.unknown_fields(), vec!["name"]);
        assert_eq!(view.len(), 3);
    }
}
