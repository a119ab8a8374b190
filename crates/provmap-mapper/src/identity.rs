//! Primary-key resolution
//!
//! [`PrimaryKey`] is the one-method capability a record implements to name
//! the remote resource it addresses. Child resources scoped under a parent
//! keep the parent id as an ordinary field; it is not part of [`Identity`].

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::tristate::TriState;

/// Opaque, comparable remote resource identifier
///
/// The default (zero) identity addresses no resource; a record whose id is
/// not assigned yet resolves to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(i64);

impl Identity {
    /// Create identity
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Capability to yield the identity of the addressed resource
///
/// Every record declared with a `#[map(pk)]` field must implement it.
pub trait PrimaryKey {
    /// Identity of the resource
    fn primary_key(&self) -> Identity;
}

/// A record the mapper can convert that also addresses a remote resource
pub trait Resource: Record + PrimaryKey {}

impl<T: Record + PrimaryKey> Resource for T {}

/// Identity of `record`
#[inline]
#[must_use]
pub fn primary_key<R: PrimaryKey + ?Sized>(record: &R) -> Identity {
    record.primary_key()
}

/// Identity held by a tri-state id field, if it is known
///
/// Model records keep their id as `TriState<i64>`; before the resource is
/// created it is unknown or null.
#[inline]
#[must_use]
pub fn resolve_identity(id: &TriState<i64>) -> Option<Identity> {
    id.as_known().copied().map(Identity)
}
