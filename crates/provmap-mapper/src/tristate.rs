//! Tri-state values
//!
//! Declarative configuration has to tell apart "not computed yet", "set to
//! nothing" and "set to this". [`TriState`] is the explicit sum type for
//! that; there is no nested-option or sentinel encoding.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MapErrorKind;

/// A configuration-side value: unknown, null, or known
///
/// # Invariants
/// - `Unknown` is never sent to the remote API and never defaulted
/// - `Null` is distinct from `Unknown`
/// - values are replaced, not mutated, across conversions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TriState<T> {
    /// Not yet determined
    Unknown,
    /// Explicitly no value
    #[default]
    Null,
    /// Concrete value
    Known(T),
}

impl<T> TriState<T> {
    /// Known value
    #[inline]
    #[must_use]
    pub const fn known(value: T) -> Self {
        Self::Known(value)
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

    /// Check if known
    #[inline]
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the known value
    #[inline]
    #[must_use]
    pub const fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Take the known value
    #[inline]
    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Borrowing view
    #[inline]
    #[must_use]
    pub const fn as_ref(&self) -> TriState<&T> {
        match self {
            Self::Unknown => TriState::Unknown,
            Self::Null => TriState::Null,
            Self::Known(value) => TriState::Known(value),
        }
    }

    /// Transform the known value, keeping unknown and null as they are
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TriState<U> {
        match self {
            Self::Unknown => TriState::Unknown,
            Self::Null => TriState::Null,
            Self::Known(value) => TriState::Known(f(value)),
        }
    }

    /// Plain-side optional slot: known → `Some`, null → `None`
    ///
    /// # Errors
    /// Returns [`MapErrorKind::CannotSendUnknownValue`] for `Unknown`, which
    /// has no plain-side form.
    pub fn into_option(self) -> Result<Option<T>, MapErrorKind> {
        match self {
            Self::Unknown => Err(MapErrorKind::CannotSendUnknownValue),
            Self::Null => Ok(None),
            Self::Known(value) => Ok(Some(value)),
        }
    }
}

impl<T> From<Option<T>> for TriState<T> {
    /// Plain-side slot into tri-state: present → known, absent → null
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for TriState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unknown => Err(serde::ser::Error::custom("cannot serialize unknown value")),
            Self::Null => serializer.serialize_none(),
            Self::Known(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TriState<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        assert!(TriState::<i64>::default().is_null());
    }

    #[test]
    fn exactly_one_state() {
        let states = [TriState::Unknown, TriState::Null, TriState::known(1)];
        for state in &states {
            let flags = [state.is_unknown(), state.is_null(), state.is_known()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        }
    }

    #[test]
    fn option_conversions() {
        assert_eq!(TriState::from(Some(3)), TriState::Known(3));
        assert_eq!(TriState::<i32>::from(None), TriState::Null);
        assert_eq!(TriState::Known(3).into_option(), Ok(Some(3)));
        assert_eq!(TriState::<i32>::Null.into_option(), Ok(None));
        assert_eq!(
            TriState::<i32>::Unknown.into_option(),
            Err(MapErrorKind::CannotSendUnknownValue)
        );
    }

    #[test]
    fn map_keeps_state() {
        assert_eq!(TriState::Known(2).map(|v| v * 2), TriState::Known(4));
        assert_eq!(TriState::<i32>::Null.map(|v| v * 2), TriState::Null);
        assert_eq!(TriState::<i32>::Unknown.map(|v| v * 2), TriState::Unknown);
    }

    #[test]
    fn serde_wire_rules() {
        assert_eq!(serde_json::to_string(&TriState::known("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&TriState::<String>::Null).unwrap(), "null");
        assert!(serde_json::to_string(&TriState::<String>::Unknown).is_err());

        let null: TriState<String> = serde_json::from_str("null").unwrap();
        assert!(null.is_null());
        let known: TriState<i64> = serde_json::from_str("5").unwrap();
        assert_eq!(known.as_known(), Some(&5));
    }
}
