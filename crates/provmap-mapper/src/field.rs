//! Field conversion
//!
//! [`Field`] moves one statically typed field to and from [`Dynamic`].
//! The destination type decides what it accepts:
//!
//! - plain types (`bool`, integers, `String`, ...) reject null and unknown
//! - `Option<T>` turns null into `None` and rejects unknown
//! - `TriState<T>` keeps null and unknown, except that copy-out rejects unknown
//! - custom scalars decode their wire text through `provmap_codec`
//! - collections convert element-wise and report errors per index or key

use std::collections::BTreeMap;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use provmap_codec::{decimal, duration, header_block, raw_json, Decimal, Duration, HeaderBlock, RawJson};
use bigdecimal::ToPrimitive;

use crate::dynamic::Dynamic;
use crate::error::{leaf, nest, FieldErrors, MapErrorKind, PathSegment};
use crate::mapper::{Cx, Mode};
use crate::tristate::TriState;

/// Static kind of a destination field, seen through `Option`/`TriState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `bool`
    Bool,
    /// Integer types
    Int,
    /// `f64`
    Float,
    /// `String`
    Text,
    /// [`Duration`]
    Duration,
    /// [`Decimal`]
    Decimal,
    /// [`RawJson`]
    Json,
    /// [`HeaderBlock`]
    Headers,
    /// `Vec<T>`
    List,
    /// `IndexSet<T>`
    Set,
    /// String-keyed maps
    Map,
    /// Nested record
    Record,
}

impl Shape {
    /// Kind name used in error messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "string",
            Self::Duration => "duration",
            Self::Decimal => "decimal",
            Self::Json => "json",
            Self::Headers => "header_block",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
            Self::Record => "record",
        }
    }
}

/// Conversion between a typed field and [`Dynamic`]
pub trait Field: Sized {
    /// Destination kind
    const SHAPE: Shape;

    /// Detach the value from its type
    fn to_dynamic(&self) -> Dynamic;

    /// Build a value of this type from a dynamic value
    ///
    /// # Errors
    /// Returns every field error found, with paths relative to this value.
    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors>;
}

/// Error for a value the destination type `T` cannot take
pub(crate) fn reject<T: Field>(value: &Dynamic) -> FieldErrors {
    match value {
        Dynamic::Null => leaf(MapErrorKind::CannotAssignNullToRequiredField),
        Dynamic::Unknown => leaf(MapErrorKind::CannotSendUnknownValue),
        other => leaf(MapErrorKind::mismatch(other.kind_name(), T::SHAPE.name())),
    }
}

impl Field for bool {
    const SHAPE: Shape = Shape::Bool;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Bool(*self)
    }

    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Bool(b) => Ok(b),
            other => Err(reject::<Self>(&other)),
        }
    }
}

macro_rules! integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                const SHAPE: Shape = Shape::Int;

                fn to_dynamic(&self) -> Dynamic {
                    Dynamic::Int(i64::from(*self))
                }

                fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
                    match value {
                        Dynamic::Int(n) => <$ty>::try_from(n)
                            .map_err(|_| leaf(MapErrorKind::mismatch("int", stringify!($ty)))),
                        other => Err(reject::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

integer_field!(i64, i32, i16, u32, u16, u8);

impl Field for f64 {
    const SHAPE: Shape = Shape::Float;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Float(*self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Float(f) => Ok(f),
            Dynamic::Int(n) => Ok(n as f64),
            Dynamic::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| leaf(MapErrorKind::mismatch("decimal", "float"))),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl Field for String {
    const SHAPE: Shape = Shape::Text;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Str(self.clone())
    }

    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Str(s) => Ok(s),
            Dynamic::Duration(d) => Ok(duration::encode(&d)),
            Dynamic::Decimal(d) => Ok(decimal::encode(&d)),
            Dynamic::Json(json) => Ok(json.into_string()),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl Field for Duration {
    const SHAPE: Shape = Shape::Duration;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Duration(*self)
    }

    /// Accepts wire text, whole seconds (int) or fractional seconds (decimal, float)
    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Duration(d) => Ok(d),
            Dynamic::Str(s) => duration::decode(&s).map_err(leaf),
            Dynamic::Int(secs) => Duration::from_seconds(&Decimal::from(secs)).map_err(leaf),
            Dynamic::Decimal(secs) => Duration::from_seconds(&secs).map_err(leaf),
            Dynamic::Float(secs) => decimal::from_f64(secs)
                .and_then(|secs| Duration::from_seconds(&secs))
                .map_err(leaf),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl Field for Decimal {
    const SHAPE: Shape = Shape::Decimal;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Decimal(self.clone())
    }

    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Decimal(d) => Ok(d),
            Dynamic::Str(s) => decimal::decode(&s).map_err(leaf),
            Dynamic::Int(n) => Ok(Decimal::from(n)),
            Dynamic::Float(f) => decimal::from_f64(f).map_err(leaf),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl Field for RawJson {
    const SHAPE: Shape = Shape::Json;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Json(self.clone())
    }

    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Json(json) => Ok(json),
            Dynamic::Str(s) => raw_json::decode(&s).map_err(leaf),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl Field for HeaderBlock {
    const SHAPE: Shape = Shape::Headers;

    fn to_dynamic(&self) -> Dynamic {
        let entries = self
            .iter()
            .map(|(name, values)| {
                let values = values.iter().cloned().map(Dynamic::Str).collect();
                (name.to_string(), Dynamic::List(values))
            })
            .collect();
        Dynamic::Map(entries)
    }

    fn from_dynamic(value: Dynamic, _cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Map(entries) => header_block_from_map(entries),
            Dynamic::Str(s) => header_block::decode(&s).map_err(leaf),
            other => Err(reject::<Self>(&other)),
        }
    }
}

/// Build a header block from `name -> [values]` or `name -> value`
///
/// Headers that would not survive the wire form are reported under their
/// name, e.g. `request_headers["X-Bad"]`.
pub(crate) fn header_block_from_map(
    entries: IndexMap<String, Dynamic>,
) -> Result<HeaderBlock, FieldErrors> {
    let mut block = HeaderBlock::new();
    let mut errors = FieldErrors::new();
    for (name, value) in entries {
        let segment = PathSegment::Key(name.clone());
        let added = match value {
            Dynamic::Str(v) => block.append(name, v),
            Dynamic::List(values) => {
                let before = errors.len();
                let mut collected = Vec::with_capacity(values.len());
                for (i, v) in values.into_iter().enumerate() {
                    match v {
                        Dynamic::Str(s) => collected.push(s),
                        other => errors.extend(nest(
                            nest(reject::<String>(&other), &PathSegment::Index(i)),
                            &segment,
                        )),
                    }
                }
                if errors.len() > before {
                    continue;
                }
                block.insert(name, collected).map(drop)
            }
            other => {
                errors.extend(nest(
                    leaf(MapErrorKind::UnsupportedFieldKind {
                        kind: other.kind_name(),
                    }),
                    &segment,
                ));
                continue;
            }
        };
        if let Err(err) = added {
            errors.extend(nest(leaf(err), &segment));
        }
    }
    if errors.is_empty() {
        Ok(block)
    } else {
        Err(errors)
    }
}

impl<T: Field> Field for Option<T> {
    const SHAPE: Shape = T::SHAPE;

    fn to_dynamic(&self) -> Dynamic {
        self.as_ref().map_or(Dynamic::Null, Field::to_dynamic)
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Null => Ok(None),
            Dynamic::Unknown => Err(leaf(MapErrorKind::CannotSendUnknownValue)),
            other => T::from_dynamic(other, cx).map(Some),
        }
    }
}

impl<T: Field> Field for TriState<T> {
    const SHAPE: Shape = T::SHAPE;

    fn to_dynamic(&self) -> Dynamic {
        match self {
            Self::Unknown => Dynamic::Unknown,
            Self::Null => Dynamic::Null,
            Self::Known(value) => value.to_dynamic(),
        }
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Null => Ok(Self::Null),
            Dynamic::Unknown if cx.mode() == Mode::CopyOut => {
                Err(leaf(MapErrorKind::CannotSendUnknownValue))
            }
            Dynamic::Unknown => Ok(Self::Unknown),
            other => T::from_dynamic(other, cx).map(Self::Known),
        }
    }
}

/// Convert elements in order, collecting errors by index
fn collect_elements<T: Field>(items: Vec<Dynamic>, cx: &Cx<'_>) -> Result<Vec<T>, FieldErrors> {
    let mut out = Vec::with_capacity(items.len());
    let mut errors = FieldErrors::new();
    for (i, item) in items.into_iter().enumerate() {
        match T::from_dynamic(item, cx) {
            Ok(value) => out.push(value),
            Err(e) => {
                errors.extend(nest(e, &PathSegment::Index(i)));
                if cx.should_stop(errors.len()) {
                    break;
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

/// Convert map values, collecting errors by key
fn collect_entries<T: Field, M: FromIterator<(String, T)>>(
    entries: IndexMap<String, Dynamic>,
    cx: &Cx<'_>,
) -> Result<M, FieldErrors> {
    let mut out = Vec::with_capacity(entries.len());
    let mut errors = FieldErrors::new();
    for (key, item) in entries {
        match T::from_dynamic(item, cx) {
            Ok(value) => out.push((key, value)),
            Err(e) => {
                errors.extend(nest(e, &PathSegment::Key(key)));
                if cx.should_stop(errors.len()) {
                    break;
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(out.into_iter().collect())
    } else {
        Err(errors)
    }
}

impl<T: Field> Field for Vec<T> {
    const SHAPE: Shape = Shape::List;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::List(self.iter().map(Field::to_dynamic).collect())
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::List(items) | Dynamic::Set(items) => collect_elements(items, cx),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl<T: Field + Hash + Eq> Field for IndexSet<T> {
    const SHAPE: Shape = Shape::Set;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Set(self.iter().map(Field::to_dynamic).collect())
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::List(items) | Dynamic::Set(items) => {
                collect_elements::<T>(items, cx).map(|v| v.into_iter().collect())
            }
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl<T: Field> Field for IndexMap<String, T> {
    const SHAPE: Shape = Shape::Map;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_dynamic()))
                .collect(),
        )
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Map(entries) => collect_entries::<T, Self>(entries, cx),
            other => Err(reject::<Self>(&other)),
        }
    }
}

impl<T: Field> Field for BTreeMap<String, T> {
    const SHAPE: Shape = Shape::Map;

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_dynamic()))
                .collect(),
        )
    }

    fn from_dynamic(value: Dynamic, cx: &Cx<'_>) -> Result<Self, FieldErrors> {
        match value {
            Dynamic::Map(entries) => collect_entries::<T, Self>(entries, cx),
            other => Err(reject::<Self>(&other)),
        }
    }
}
