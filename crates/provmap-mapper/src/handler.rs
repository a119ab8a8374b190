//! Extra handlers
//!
//! A field marked `#[map(extra = ...)]` is converted by a named handler
//! before generic assignment. The header-block handler moves a whole header
//! attribute between its wire text and its name-to-values map, in whichever
//! direction the destination field's shape asks for.

use provmap_codec::header_block;

use crate::directive::HandlerId;
use crate::dynamic::Dynamic;
use crate::error::{leaf, FieldErrors, MapErrorKind};
use crate::field::{header_block_from_map, Field, Shape};

/// Run handler `id` on a source value for a destination of `shape`
///
/// # Errors
/// Returns the handler's decode errors, or
/// [`MapErrorKind::UnsupportedFieldKind`] when the destination shape is not
/// one the handler serves.
pub fn dispatch(id: HandlerId, value: Dynamic, shape: Option<Shape>) -> Result<Dynamic, FieldErrors> {
    match id {
        HandlerId::HeaderBlock => header_block_handler(value, shape),
    }
}

fn header_block_handler(value: Dynamic, shape: Option<Shape>) -> Result<Dynamic, FieldErrors> {
    if value.is_null() || value.is_unknown() {
        return Ok(value);
    }
    match (shape, value) {
        (Some(Shape::Headers), Dynamic::Str(wire)) => {
            let block = header_block::decode(&wire).map_err(leaf)?;
            Ok(block.to_dynamic())
        }
        (Some(Shape::Headers), value @ Dynamic::Map(_)) => Ok(value),
        (Some(Shape::Text), Dynamic::Map(entries)) => {
            let block = header_block_from_map(entries)?;
            Ok(Dynamic::Str(header_block::encode(&block)))
        }
        (Some(Shape::Text), value @ Dynamic::Str(_)) => Ok(value),
        (Some(Shape::Map), value @ Dynamic::Map(_)) => Ok(value),
        (Some(Shape::Map), Dynamic::Str(wire)) => {
            let block = header_block::decode(&wire).map_err(leaf)?;
            Ok(block.to_dynamic())
        }
        (Some(Shape::Headers | Shape::Text | Shape::Map), other) => {
            Err(leaf(MapErrorKind::UnsupportedFieldKind {
                kind: other.kind_name(),
            }))
        }
        (shape, _) => Err(leaf(MapErrorKind::UnsupportedFieldKind {
            kind: shape.map_or("missing", Shape::name),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provmap_codec::HeaderBlock;

    fn wire() -> Dynamic {
        Dynamic::Str("Foo: Bar\r\nFoo: Baz\r\nQux: Quux\r\n".to_string())
    }

    #[test]
    fn text_to_headers() {
        let out = dispatch(HandlerId::HeaderBlock, wire(), Some(Shape::Headers)).unwrap();
        let Dynamic::Map(entries) = out else {
            panic!("expected map");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["Foo", "Qux"]);
        assert_eq!(
            entries.get("Foo"),
            Some(&Dynamic::List(vec![
                Dynamic::Str("Bar".to_string()),
                Dynamic::Str("Baz".to_string()),
            ]))
        );
    }

    #[test]
    fn headers_to_text() {
        let block = HeaderBlock::from_pairs([("Destination", "Eschaton")]).unwrap();
        let out = dispatch(HandlerId::HeaderBlock, block.to_dynamic(), Some(Shape::Text)).unwrap();
        assert_eq!(out, Dynamic::Str("Destination: Eschaton\r\n".to_string()));
    }

    #[test]
    fn injected_line_break_is_rejected() {
        let entries = indexmap::IndexMap::from([(
            "X-Note".to_string(),
            Dynamic::Str("ok\r\nX-Admin: true".to_string()),
        )]);
        let err = dispatch(HandlerId::HeaderBlock, Dynamic::Map(entries), Some(Shape::Text))
            .unwrap_err();
        assert_eq!(err[0].path().to_string(), "[\"X-Note\"]");
        assert!(matches!(err[0].kind(), MapErrorKind::Codec(_)));
    }

    #[test]
    fn empty_text_is_empty_map() {
        let out = dispatch(
            HandlerId::HeaderBlock,
            Dynamic::Str(String::new()),
            Some(Shape::Headers),
        )
        .unwrap();
        assert_eq!(out, Dynamic::Map(indexmap::IndexMap::new()));
    }

    #[test]
    fn null_and_unknown_pass_through() {
        assert_eq!(
            dispatch(HandlerId::HeaderBlock, Dynamic::Null, Some(Shape::Text)).unwrap(),
            Dynamic::Null
        );
        assert_eq!(
            dispatch(HandlerId::HeaderBlock, Dynamic::Unknown, Some(Shape::Headers)).unwrap(),
            Dynamic::Unknown
        );
    }

    #[test]
    fn bad_line_is_codec_error() {
        let err = dispatch(
            HandlerId::HeaderBlock,
            Dynamic::Str("no separator".to_string()),
            Some(Shape::Headers),
        )
        .unwrap_err();
        assert!(matches!(err[0].kind(), MapErrorKind::Codec(_)));
    }

    #[test]
    fn wrong_shape_rejected() {
        let err = dispatch(HandlerId::HeaderBlock, wire(), Some(Shape::Int)).unwrap_err();
        assert_eq!(
            err[0].kind(),
            &MapErrorKind::UnsupportedFieldKind { kind: "int" }
        );
    }
}
