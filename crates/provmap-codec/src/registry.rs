//! Codec registry
//!
//! Provides [`CodecRegistry`], a name-keyed table of wire-level codecs, and
//! [`global`], the process-wide read-only instance holding the built-in
//! kinds.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::decimal::DecimalCodec;
use crate::duration::DurationCodec;
use crate::error::{CodecError, CodecResult};
use crate::header_block::HeaderBlockCodec;
use crate::raw_json::RawJsonCodec;
use crate::{ScalarCodec, ScalarKind};

/// Object-safe codec working on wire strings only
///
/// Lets callers that only hold attribute text (schema validators, diff
/// suppression) work with any registered kind.
pub trait WireCodec: Send + Sync {
    /// Registry name of this kind
    fn name(&self) -> &str;

    /// Check that `wire` decodes
    ///
    /// # Errors
    /// Returns the decode error of the kind.
    fn validate(&self, wire: &str) -> CodecResult<()>;

    /// Decode then re-encode `wire`
    ///
    /// # Errors
    /// Returns the decode error of the kind.
    fn normalize(&self, wire: &str) -> CodecResult<String>;

    /// Decode both strings and compare them semantically
    ///
    /// # Errors
    /// Returns the first decode error.
    fn semantically_equal(&self, a: &str, b: &str) -> CodecResult<bool>;
}

/// Adapts a typed [`ScalarCodec`] to [`WireCodec`]
pub struct Wire<C>(PhantomData<fn() -> C>);

impl<C> Wire<C> {
    /// Create adapter
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for Wire<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ScalarCodec> WireCodec for Wire<C> {
    fn name(&self) -> &str {
        C::KIND.name()
    }

    fn validate(&self, wire: &str) -> CodecResult<()> {
        C::decode(wire).map(|_| ())
    }

    fn normalize(&self, wire: &str) -> CodecResult<String> {
        C::decode(wire).map(|value| C::encode(&value))
    }

    fn semantically_equal(&self, a: &str, b: &str) -> CodecResult<bool> {
        if a == b {
            return self.validate(a).map(|()| true);
        }
        let left = C::decode(a)?;
        let right = C::decode(b)?;
        Ok(C::semantically_equal(&left, &right))
    }
}

/// Name-keyed table of wire codecs
#[derive(Default)]
pub struct CodecRegistry {
    codecs: IndexMap<String, Box<dyn WireCodec>>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.names())
            .finish()
    }
}

impl CodecRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in kinds
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Wire::<DurationCodec>::new());
        registry.register(Wire::<DecimalCodec>::new());
        registry.register(Wire::<RawJsonCodec>::new());
        registry.register(Wire::<HeaderBlockCodec>::new());
        registry
    }

    /// Register a codec under its own name, replacing any previous one
    pub fn register(&mut self, codec: impl WireCodec + 'static) {
        let name = codec.name().to_string();
        tracing::debug!(codec = %name, "registering scalar codec");
        self.codecs.insert(name, Box::new(codec));
    }

    /// Look up a codec by name
    ///
    /// # Errors
    /// Returns [`CodecError::UnknownCodec`] if nothing is registered.
    pub fn get(&self, name: &str) -> CodecResult<&dyn WireCodec> {
        self.codecs
            .get(name)
            .map(|codec| &**codec)
            .ok_or_else(|| CodecError::UnknownCodec(name.to_string()))
    }

    /// Look up a built-in kind
    ///
    /// # Errors
    /// Returns [`CodecError::UnknownCodec`] if the kind was not registered.
    pub fn kind(&self, kind: ScalarKind) -> CodecResult<&dyn WireCodec> {
        self.get(kind.name())
    }

    /// Check if a name is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.codecs.keys().map(String::as_str).collect()
    }

    /// Number of registered codecs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Validate wire text of the named kind
    ///
    /// # Errors
    /// Unknown kind or decode failure.
    pub fn validate(&self, name: &str, wire: &str) -> CodecResult<()> {
        self.get(name)?.validate(wire)
    }

    /// Normalize wire text of the named kind
    ///
    /// # Errors
    /// Unknown kind or decode failure.
    pub fn normalize(&self, name: &str, wire: &str) -> CodecResult<String> {
        self.get(name)?.normalize(wire)
    }

    /// Semantic comparison of two wire strings of the named kind
    ///
    /// # Errors
    /// Unknown kind or decode failure.
    pub fn semantically_equal(&self, name: &str, a: &str, b: &str) -> CodecResult<bool> {
        self.get(name)?.semantically_equal(a, b)
    }
}

static GLOBAL: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::with_defaults);

/// Process-wide registry of the built-in kinds
///
/// Built on first use and read-only afterwards.
#[must_use]
pub fn global() -> &'static CodecRegistry {
    &GLOBAL
}
