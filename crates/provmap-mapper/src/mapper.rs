//! Record mapper
//!
//! One algorithm serves all three directions. For each destination field:
//!
//! 1. look up the source field by its `rename` target, else by its own name
//! 2. skip it when absent, unless it is a non-`opt` primary key
//! 3. leave an identity alone when the source identity is still unknown
//! 4. convert through the extra handler, or through the generic [`Field`] rules
//!
//! Errors from every field are collected with their paths. The destination
//! is written only when the whole call succeeds.

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::config::MapperConfig;
use crate::directive::{validate_fields, FieldStrategy};
use crate::dynamic::{Dynamic, RecordView};
use crate::error::{leaf, FieldError, FieldErrors, MapErrorKind, MappingError, MapResult, PathSegment};
use crate::field::{reject, Field, Shape};
use crate::handler;
use crate::record::Record;

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plain → Model
    CopyIn,
    /// Model → Plain
    CopyOut,
    /// Plain ⇄ Plain, identity coercion enabled
    Mirror,
}

impl Mode {
    /// Mode name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CopyIn => "copy_in",
            Self::CopyOut => "copy_out",
            Self::Mirror => "mirror",
        }
    }
}

/// Per-call conversion context
#[derive(Debug, Clone, Copy)]
pub struct Cx<'a> {
    mode: Mode,
    config: &'a MapperConfig,
}

impl<'a> Cx<'a> {
    /// Create context
    #[inline]
    #[must_use]
    pub const fn new(mode: Mode, config: &'a MapperConfig) -> Self {
        Self { mode, config }
    }

    /// Conversion direction
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &'a MapperConfig {
        self.config
    }

    /// Stop collecting once `count` errors are held
    #[inline]
    #[must_use]
    pub fn should_stop(&self, count: usize) -> bool {
        (self.config.fail_fast && count > 0)
            || self.config.max_errors.is_some_and(|max| count >= max)
    }
}

/// Apply a source view to a destination record, field by field
///
/// # Errors
/// Returns every field error found, each prefixed with its field name.
pub fn apply_view<R: Record>(dst: &mut R, src: &RecordView, cx: &Cx<'_>) -> Result<(), FieldErrors> {
    validate_fields(R::NAME, R::FIELDS).map_err(leaf)?;

    let mut errors = FieldErrors::new();
    for spec in R::FIELDS {
        let directive = spec.directive();
        let source_name = spec.source_name();
        let segment = PathSegment::Field(spec.name().to_string());

        let Some(entry) = src.get(source_name) else {
            if directive.requires_counterpart() {
                errors.push(
                    FieldError::new(MapErrorKind::MissingPrimaryKeyField {
                        record: src.record(),
                        field: source_name,
                    })
                    .within(segment),
                );
                if cx.should_stop(errors.len()) {
                    break;
                }
            } else if cx.config().trace_fields {
                trace!(record = R::NAME, field = spec.name(), "no source counterpart, skipped");
            }
            continue;
        };

        if entry.value.is_unknown() && (entry.primary_key || directive.is_primary_key()) {
            debug!(
                record = R::NAME,
                field = spec.name(),
                "identity unknown in source, left unassigned"
            );
            continue;
        }

        if cx.config().trace_fields {
            trace!(
                record = R::NAME,
                field = spec.name(),
                source = source_name,
                kind = entry.value.kind_name(),
                "field resolved"
            );
        }

        let shape = R::field_shape(spec.name());
        let value = match directive.strategy() {
            FieldStrategy::ExtraHandler(id) => handler::dispatch(id, entry.value.clone(), shape),
            FieldStrategy::Generic
                if cx.mode() == Mode::Mirror
                    && directive.renamed().is_some()
                    && entry.primary_key =>
            {
                coerce_identity(entry.value.clone(), shape)
            }
            FieldStrategy::Generic => Ok(entry.value.clone()),
        };

        let result = value.and_then(|value| dst.set_field(spec.name(), value, cx));
        if let Err(field_errors) = result {
            errors.extend(field_errors.into_iter().map(|e| e.within(segment.clone())));
            if cx.should_stop(errors.len()) {
                break;
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Number ⇄ text conversion of an identity value for a mirrored field
///
/// # Errors
/// Returns [`MapErrorKind::TypeMismatch`] when text does not hold an integer.
pub fn coerce_identity(value: Dynamic, shape: Option<Shape>) -> Result<Dynamic, FieldErrors> {
    match (value, shape) {
        (Dynamic::Int(n), Some(Shape::Text)) => Ok(Dynamic::Str(n.to_string())),
        (Dynamic::Str(s), Some(Shape::Int)) => s
            .trim()
            .parse::<i64>()
            .map(Dynamic::Int)
            .map_err(|_| leaf(MapErrorKind::mismatch("string", "int"))),
        (value, _) => Ok(value),
    }
}

/// Build a nested record from a dynamic value
///
/// Starts from `R::default()` so every destination field is rebuilt from the
/// source rather than merged.
///
/// # Errors
/// Returns the field errors of the nested record, or a single error when the
/// value is not a record.
pub fn record_from_dynamic<R: Record + Field>(value: Dynamic, cx: &Cx<'_>) -> Result<R, FieldErrors> {
    match value {
        Dynamic::Record(view) => {
            let mut record = R::default();
            apply_view(&mut record, &view, cx)?;
            Ok(record)
        }
        other => Err(reject::<R>(&other)),
    }
}

/// Record mapper with its configuration
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

static GLOBAL: Lazy<Mapper> = Lazy::new(|| Mapper::new(MapperConfig::default()));

impl Mapper {
    /// Create mapper
    #[inline]
    #[must_use]
    pub const fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Shared mapper with the default configuration
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Plain → Model
    ///
    /// # Errors
    /// Returns every field that could not be converted; `dst` is unchanged.
    pub fn copy_in<D: Record, S: Record>(&self, dst: &mut D, src: &S) -> MapResult<()> {
        self.apply(Mode::CopyIn, dst, Dynamic::Record(src.to_view()))
    }

    /// Model → Plain
    ///
    /// # Errors
    /// Returns every field that could not be converted, including unknown
    /// non-identity fields; `dst` is unchanged.
    pub fn copy_out<D: Record, S: Record>(&self, dst: &mut D, src: &S) -> MapResult<()> {
        self.apply(Mode::CopyOut, dst, Dynamic::Record(src.to_view()))
    }

    /// Plain ⇄ Plain
    ///
    /// # Errors
    /// Returns every field that could not be converted; `dst` is unchanged.
    pub fn mirror<D: Record, S: Record>(&self, dst: &mut D, src: &S) -> MapResult<()> {
        self.apply(Mode::Mirror, dst, Dynamic::Record(src.to_view()))
    }

    /// Map a dynamic source into `dst`
    ///
    /// A source that is not a record aborts at once with a type mismatch.
    ///
    /// # Errors
    /// Returns the aggregated field errors; `dst` is unchanged.
    pub fn apply<D: Record>(&self, mode: Mode, dst: &mut D, src: Dynamic) -> MapResult<()> {
        let view = match src {
            Dynamic::Record(view) => view,
            other => {
                return Err(MappingError::single(MapErrorKind::mismatch(
                    other.kind_name(),
                    "record",
                )))
            }
        };

        debug!(
            mode = mode.name(),
            src = view.record(),
            dst = D::NAME,
            "mapping started"
        );

        let cx = Cx::new(mode, &self.config);
        let mut staged = dst.clone();
        match apply_view(&mut staged, &view, &cx) {
            Ok(()) => {
                *dst = staged;
                debug!(mode = mode.name(), dst = D::NAME, errors = 0, "mapping finished");
                Ok(())
            }
            Err(mut errors) => {
                if let Some(limit) = self.error_limit() {
                    errors.truncate(limit);
                }
                debug!(
                    mode = mode.name(),
                    dst = D::NAME,
                    errors = errors.len(),
                    "mapping failed"
                );
                Err(MappingError::new(errors))
            }
        }
    }

    fn error_limit(&self) -> Option<usize> {
        if self.config.fail_fast {
            Some(1)
        } else {
            self.config.max_errors.map(|max| max.max(1))
        }
    }
}

/// Plain → Model with the shared mapper
///
/// # Errors
/// See [`Mapper::copy_in`].
pub fn copy_in<D: Record, S: Record>(dst: &mut D, src: &S) -> MapResult<()> {
    Mapper::global().copy_in(dst, src)
}

/// Model → Plain with the shared mapper
///
/// # Errors
/// See [`Mapper::copy_out`].
pub fn copy_out<D: Record, S: Record>(dst: &mut D, src: &S) -> MapResult<()> {
    Mapper::global().copy_out(dst, src)
}

/// Plain ⇄ Plain with the shared mapper
///
/// # Errors
/// See [`Mapper::mirror`].
pub fn mirror<D: Record, S: Record>(dst: &mut D, src: &S) -> MapResult<()> {
    Mapper::global().mirror(dst, src)
}
