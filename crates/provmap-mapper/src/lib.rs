//! provmap Record Mapper
//!
//! Converts between configuration-side *Model* records, whose fields are
//! [`TriState`] values, and API-side *Plain* records with native optional
//! fields.
//!
//! # Directions
//!
//! - [`copy_in`]: Plain → Model; an absent optional becomes `Null`, never `Unknown`
//! - [`copy_out`]: Model → Plain; `Unknown` is rejected, `Null` needs an optional slot
//! - [`mirror`]: Plain ⇄ Plain; a renamed identity converts between number and text
//!
//! Every call collects all field errors with their paths into one
//! [`MappingError`] and leaves the destination untouched on failure.
//!
//! # Example
//!
//! ```rust
//! use provmap_mapper::{copy_in, copy_out, record, MapErrorKind, TriState};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct CheckPlain {
//!         pub name: String,
//!         pub description: Option<String>,
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct CheckModel {
//!         pub name: TriState<String>,
//!         pub description: TriState<String>,
//!     }
//! }
//!
//! let plain = CheckPlain { name: "api".into(), description: None };
//! let mut model = CheckModel::default();
//! copy_in(&mut model, &plain).unwrap();
//! assert_eq!(model.description, TriState::Null);
//!
//! model.name = TriState::Null;
//! let mut out = CheckPlain::default();
//! let err = copy_out(&mut out, &model).unwrap_err();
//! assert!(err.contains(|k| matches!(k, MapErrorKind::CannotAssignNullToRequiredField)));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod directive;
pub mod dynamic;
pub mod error;
pub mod field;
pub mod handler;
pub mod identity;
pub mod logging;
pub mod mapper;
pub mod record;
pub mod tristate;
pub mod validate;

pub use config::{ConfigError, MapperConfig};
pub use directive::{FieldDirective, FieldSpec, FieldStrategy, HandlerId};
pub use dynamic::{Dynamic, RecordView, ViewEntry};
pub use error::{FieldError, FieldErrors, FieldPath, MapErrorKind, MapResult, MappingError, PathSegment};
pub use field::{Field, Shape};
pub use identity::{primary_key, resolve_identity, Identity, PrimaryKey, Resource};
pub use mapper::{copy_in, copy_out, mirror, Cx, Mapper, Mode};
pub use record::Record;
pub use tristate::TriState;
pub use validate::{suppress_diff, validate_attribute};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
