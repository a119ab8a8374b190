//! Record field tables
//!
//! A [`Record`] exposes a constant table of its fields and directives, a
//! [`RecordView`] of its current values, and per-field assignment. The
//! [`record!`](crate::record) macro writes all three from a struct
//! definition, so field resolution costs no runtime introspection:
//!
//! ```rust
//! use provmap_mapper::{record, resolve_identity, Identity, PrimaryKey, Record, TriState};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct CheckModel {
//!         #[map(rename = "ID", pk)]
//!         pub id: TriState<i64>,
//!         pub name: TriState<String>,
//!     }
//! }
//!
//! impl PrimaryKey for CheckModel {
//!     fn primary_key(&self) -> Identity {
//!         resolve_identity(&self.id).unwrap_or_default()
//!     }
//! }
//!
//! assert_eq!(CheckModel::NAME, "CheckModel");
//! assert_eq!(CheckModel::FIELDS[0].source_name(), "ID");
//! ```
//!
//! Doc comments on fields are kept; they must come before `#[map(...)]`.
//! A record with a `pk` field must implement [`PrimaryKey`](crate::PrimaryKey);
//! the macro asserts it at compile time.

use crate::directive::{primary_key_field, FieldSpec};
use crate::dynamic::{Dynamic, RecordView};
use crate::error::FieldErrors;
use crate::field::Shape;
use crate::mapper::Cx;

/// A struct the mapper can read from and write into
pub trait Record: Clone + Default + 'static {
    /// Record type name
    const NAME: &'static str;

    /// Destination-side field table, in declaration order
    const FIELDS: &'static [FieldSpec];

    /// Static shape of a field, if the record has it
    fn field_shape(name: &str) -> Option<Shape>;

    /// Current values
    fn to_view(&self) -> RecordView;

    /// Replace one field's value
    ///
    /// # Errors
    /// Returns the conversion errors of the field, with paths relative to it.
    fn set_field(&mut self, name: &str, value: Dynamic, cx: &Cx<'_>) -> Result<(), FieldErrors>;

    /// Check if the field carries the primary-key marker
    #[must_use]
    fn is_primary_key(name: &str) -> bool {
        primary_key_field(Self::FIELDS).is_some_and(|f| f.name() == name)
    }
}

/// Declare a struct together with its [`Record`] and [`Field`](crate::Field) impls
///
/// Field directives: `#[map(rename = "Other")]`, `#[map(pk)]`,
/// `#[map(pk, opt)]`, `#[map(extra = HeaderBlock)]`, combinable in one list.
///
/// A `pk` field without a [`PrimaryKey`](crate::PrimaryKey) impl does not
/// compile:
///
/// ```compile_fail
/// use provmap_mapper::{record, TriState};
///
/// record! {
///     #[derive(Debug, Clone, Default)]
///     pub struct Keyless {
///         #[map(pk)]
///         pub id: TriState<i64>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[map($($dir:tt)*)])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $ty,
            )*
        }

        $($($crate::__require_primary_key!($name; $($dir)*);)?)*

        impl $crate::Record for $name {
            const NAME: &'static str = stringify!($name);

            const FIELDS: &'static [$crate::FieldSpec] = &[
                $(
                    $crate::FieldSpec::new(
                        stringify!($field),
                        $crate::__map_directive!($crate::FieldDirective::new(); $($($dir)*)?),
                    ),
                )*
            ];

            fn field_shape(name: &str) -> ::core::option::Option<$crate::Shape> {
                match name {
                    $(stringify!($field) => ::core::option::Option::Some(<$ty as $crate::Field>::SHAPE),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn to_view(&self) -> $crate::RecordView {
                let mut view = $crate::RecordView::new(stringify!($name));
                $(
                    view.insert(
                        stringify!($field),
                        $crate::Field::to_dynamic(&self.$field),
                        <Self as $crate::Record>::is_primary_key(stringify!($field)),
                    );
                )*
                view
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Dynamic,
                cx: &$crate::Cx<'_>,
            ) -> ::core::result::Result<(), $crate::FieldErrors> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::Field>::from_dynamic(value, cx)?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err($crate::error::leaf(
                        $crate::MapErrorKind::UnsupportedFieldKind { kind: value.kind_name() },
                    )),
                }
            }
        }

        impl $crate::Field for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Record;

            fn to_dynamic(&self) -> $crate::Dynamic {
                $crate::Dynamic::Record($crate::Record::to_view(self))
            }

            fn from_dynamic(
                value: $crate::Dynamic,
                cx: &$crate::Cx<'_>,
            ) -> ::core::result::Result<Self, $crate::FieldErrors> {
                $crate::mapper::record_from_dynamic::<Self>(value, cx)
            }
        }
    };
}

/// Fold a `#[map(...)]` token list into a `FieldDirective` expression
#[doc(hidden)]
#[macro_export]
macro_rules! __map_directive {
    ($acc:expr;) => { $acc };
    ($acc:expr; , $($rest:tt)*) => { $crate::__map_directive!($acc; $($rest)*) };
    ($acc:expr; rename = $source:literal $($rest:tt)*) => {
        $crate::__map_directive!($acc.rename($source); $($rest)*)
    };
    ($acc:expr; pk $($rest:tt)*) => {
        $crate::__map_directive!($acc.primary_key(); $($rest)*)
    };
    ($acc:expr; opt $($rest:tt)*) => {
        $crate::__map_directive!($acc.optional(); $($rest)*)
    };
    ($acc:expr; extra = $handler:ident $($rest:tt)*) => {
        $crate::__map_directive!($acc.extra($crate::HandlerId::$handler); $($rest)*)
    };
}

/// Assert a `PrimaryKey` impl for a record whose directive list holds `pk`
#[doc(hidden)]
#[macro_export]
macro_rules! __require_primary_key {
    ($name:ident;) => {};
    ($name:ident; pk $($rest:tt)*) => {
        const _: fn() = || {
            fn require_primary_key<T: $crate::PrimaryKey>() {}
            require_primary_key::<$name>();
        };
    };
    ($name:ident; $skip:tt $($rest:tt)*) => {
        $crate::__require_primary_key!($name; $($rest)*);
    };
}
