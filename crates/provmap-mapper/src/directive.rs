//! Field-mapping directives
//!
//! A directive sits on a destination field and says how to find its source
//! counterpart:
//!
//! - `rename = "other"`: match the source field `other` instead of the same name
//! - `pk`: the field is the record's identity; a missing source counterpart
//!   is an error
//! - `opt`: qualifies `pk`; the counterpart may be absent
//! - `extra = HeaderBlock`: convert through a named handler instead of the
//!   generic scalar/collection rules
//!
//! Directives are written in the [`record!`](crate::record) macro as
//! `#[map(rename = "ID", pk, opt)]` and compile to a constant table.

use crate::error::MapErrorKind;

/// Named side-channel conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerId {
    /// Whole-attribute conversion between header-block text and a header map
    HeaderBlock,
}

impl HandlerId {
    /// Handler name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HeaderBlock => "header_block",
        }
    }
}

/// How a field's value is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldStrategy {
    /// Scalar, collection and nested-record rules
    #[default]
    Generic,
    /// Dispatch to a named handler first
    ExtraHandler(HandlerId),
}

/// Parsed directive for one destination field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldDirective {
    rename: Option<&'static str>,
    primary_key: bool,
    optional: bool,
    strategy: FieldStrategy,
}

impl FieldDirective {
    /// No directive: same-name, generic conversion
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rename: None,
            primary_key: false,
            optional: false,
            strategy: FieldStrategy::Generic,
        }
    }

    /// Match the source field `name`
    #[inline]
    #[must_use]
    pub const fn rename(self, name: &'static str) -> Self {
        Self {
            rename: Some(name),
            ..self
        }
    }

    /// Mark as primary key
    #[inline]
    #[must_use]
    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }

    /// Allow the primary-key counterpart to be absent
    #[inline]
    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    /// Convert through `handler`
    #[inline]
    #[must_use]
    pub const fn extra(self, handler: HandlerId) -> Self {
        Self {
            strategy: FieldStrategy::ExtraHandler(handler),
            ..self
        }
    }

    /// Explicit source name, if overridden
    #[inline]
    #[must_use]
    pub const fn renamed(&self) -> Option<&'static str> {
        self.rename
    }

    /// Check if primary key
    #[inline]
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Check if the `opt` qualifier is present
    #[inline]
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Conversion strategy
    #[inline]
    #[must_use]
    pub const fn strategy(&self) -> FieldStrategy {
        self.strategy
    }

    /// A missing counterpart is an error
    #[inline]
    #[must_use]
    pub const fn requires_counterpart(&self) -> bool {
        self.primary_key && !self.optional
    }
}

/// A destination field with its directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: &'static str,
    directive: FieldDirective,
}

impl FieldSpec {
    /// Create field spec
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, directive: FieldDirective) -> Self {
        Self { name, directive }
    }

    /// Field name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field directive
    #[inline]
    #[must_use]
    pub const fn directive(&self) -> &FieldDirective {
        &self.directive
    }

    /// Name to look up on the source side
    #[inline]
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        match self.directive.rename {
            Some(name) => name,
            None => self.name,
        }
    }
}

/// Check the directive rules of one record's field table
///
/// # Errors
/// Returns [`MapErrorKind::InvalidDirective`] when more than one field is a
/// primary key or `opt` appears without `pk`.
pub fn validate_fields(record: &'static str, fields: &[FieldSpec]) -> Result<(), MapErrorKind> {
    let keys: Vec<&str> = fields
        .iter()
        .filter(|f| f.directive.primary_key)
        .map(|f| f.name)
        .collect();
    if keys.len() > 1 {
        return Err(MapErrorKind::InvalidDirective {
            record,
            reason: format!("more than one primary key: {}", keys.join(", ")),
        });
    }
    if let Some(field) = fields
        .iter()
        .find(|f| f.directive.optional && !f.directive.primary_key)
    {
        return Err(MapErrorKind::InvalidDirective {
            record,
            reason: format!("'opt' without 'pk' on field {}", field.name),
        });
    }
    Ok(())
}

/// Primary-key field of a table, if any
#[must_use]
pub(crate) fn primary_key_field(fields: &[FieldSpec]) -> Option<&FieldSpec> {
    fields.iter().find(|f| f.directive.primary_key)
}
