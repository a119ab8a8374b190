//! Header-block codec
//!
//! Wire form is a block of `Key: Value` lines, each terminated by `\r\n`.
//! The value form is a multimap from header name to an ordered list of
//! values, so repeated names (`Foo: Bar`, `Foo: Baz`) are preserved.
//!
//! Encoding keeps the relative order of distinct names as inserted and emits
//! one line per value. The empty string and the empty map encode to each
//! other.
//!
//! Every header held by a [`HeaderBlock`] survives an encode/decode round
//! trip. Names are non-empty, carry no `:`, CR or LF and no surrounding
//! whitespace. Values carry no CR or LF and no leading whitespace. A name is
//! present only with at least one value.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, CodecResult};
use crate::{ScalarCodec, ScalarKind};

const LINE_END: &str = "\r\n";

/// Ordered multimap of header names to values
///
/// Equality ignores the order of distinct names but not the order of values
/// under one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    entries: IndexMap<String, Vec<String>>,
}

impl HeaderBlock {
    /// Create empty block
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, appending in order
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidHeaderLine`] for the first pair that
    /// would not survive encoding.
    pub fn from_pairs<I, K, V>(pairs: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut block = Self::new();
        for (name, value) in pairs {
            block.append(name, value)?;
        }
        Ok(block)
    }

    /// Append a value under `name`, keeping earlier values
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidHeaderLine`] if the name or the value
    /// would not survive encoding; the block is left unchanged.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) -> CodecResult<()> {
        let (name, value) = (name.into(), value.into());
        check_header(&name, &value)?;
        self.entries.entry(name).or_default().push(value);
        Ok(())
    }

    /// Replace all values under `name`
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidHeaderLine`] if `values` is empty or any
    /// header would not survive encoding; the block is left unchanged.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> CodecResult<Option<Vec<String>>> {
        let name = name.into();
        if values.is_empty() {
            return Err(CodecError::invalid_header_line(
                format!("{name}:"),
                format!("{name}:"),
                "header has no values",
            ));
        }
        for value in &values {
            check_header(&name, value)?;
        }
        Ok(self.entries.insert(name, values))
    }

    /// First value under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values under `name`
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate names and their values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Borrow the underlying map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.entries
    }
}

impl TryFrom<IndexMap<String, Vec<String>>> for HeaderBlock {
    type Error = CodecError;

    fn try_from(entries: IndexMap<String, Vec<String>>) -> CodecResult<Self> {
        let mut block = Self::new();
        for (name, values) in entries {
            block.insert(name, values)?;
        }
        Ok(block)
    }
}

impl From<HeaderBlock> for IndexMap<String, Vec<String>> {
    fn from(block: HeaderBlock) -> Self {
        block.entries
    }
}

impl Display for HeaderBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for HeaderBlock {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Serialize for HeaderBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(self))
    }
}

impl<'de> Deserialize<'de> for HeaderBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = String::deserialize(deserializer)?;
        decode(&wire).map_err(serde::de::Error::custom)
    }
}

/// Codec marker for [`HeaderBlock`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderBlockCodec;

impl ScalarCodec for HeaderBlockCodec {
    type Value = HeaderBlock;

    const KIND: ScalarKind = ScalarKind::HeaderBlock;

    fn encode(value: &HeaderBlock) -> String {
        encode(value)
    }

    fn decode(wire: &str) -> CodecResult<HeaderBlock> {
        decode(wire)
    }

    fn semantically_equal(a: &HeaderBlock, b: &HeaderBlock) -> bool {
        semantically_equal(a, b)
    }
}

fn check_header(name: &str, value: &str) -> CodecResult<()> {
    let reason = if name.is_empty() {
        "empty header name"
    } else if name.contains([':', '\r', '\n']) {
        "header name contains ':', CR or LF"
    } else if name.trim() != name {
        "header name has surrounding whitespace"
    } else if value.contains(['\r', '\n']) {
        "header value contains CR or LF"
    } else if value.trim_start() != value {
        "header value has leading whitespace"
    } else {
        return Ok(());
    };
    let line = format!("{name}: {value}");
    Err(CodecError::invalid_header_line(line.clone(), line, reason))
}

/// Encode as `Key: Value\r\n` lines, one per value
#[must_use]
pub fn encode(value: &HeaderBlock) -> String {
    let mut out = String::new();
    for (name, values) in &value.entries {
        for v in values {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(v);
            out.push_str(LINE_END);
        }
    }
    out
}

/// Decode a header block
///
/// Blank lines are skipped; a bare `\n` is accepted as a line end. Each line
/// splits on its first `:`, and leading whitespace of the value is dropped.
///
/// # Errors
/// Returns [`CodecError::InvalidHeaderLine`] for a line without `:`, with an
/// empty name, or with a stray CR.
pub fn decode(wire: &str) -> CodecResult<HeaderBlock> {
    let mut block = HeaderBlock::new();
    for raw_line in wire.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            CodecError::invalid_header_line(wire, line, "missing ':' separator")
        })?;
        block
            .append(name.trim(), value.trim_start())
            .map_err(|err| match err {
                CodecError::InvalidHeaderLine { reason, .. } => {
                    CodecError::invalid_header_line(wire, line, reason)
                }
                other => other,
            })?;
    }
    Ok(block)
}

/// Compare decoded blocks; name order is irrelevant, value order is not
#[inline]
#[must_use]
pub fn semantically_equal(a: &HeaderBlock, b: &HeaderBlock) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_empty_block() {
        let block = decode("").unwrap();
        assert!(block.is_empty());
        assert_eq!(encode(&block), "");
    }

    #[test]
    fn single_header_round_trips_exactly() {
        let wire = "Destination: Eschaton\r\n";
        let block = decode(wire).unwrap();
        assert_eq!(block.get_all("Destination"), ["Eschaton".to_string()]);
        assert_eq!(block.len(), 1);
        assert_eq!(encode(&block), wire);
    }

    #[test]
    fn repeated_names_keep_value_order() {
        let block = decode("Foo: Bar\r\nFoo: Baz\r\nQux: Quux\r\n").unwrap();
        assert_eq!(block.get_all("Foo"), ["Bar".to_string(), "Baz".to_string()]);
        assert_eq!(block.get_all("Qux"), ["Quux".to_string()]);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn encode_keeps_name_order_and_one_line_per_value() {
        let mut block = HeaderBlock::new();
        block.append("Zeta", "1").unwrap();
        block.append("Alpha", "2").unwrap();
        block.append("Zeta", "3").unwrap();
        assert_eq!(encode(&block), "Zeta: 1\r\nZeta: 3\r\nAlpha: 2\r\n");
    }

    #[test]
    fn decode_without_trailing_line_end_or_space() {
        let block = decode("A:1\r\nB: two words").unwrap();
        assert_eq!(block.get("A"), Some("1"));
        assert_eq!(block.get("B"), Some("two words"));
    }

    #[test]
    fn decode_splits_on_first_colon() {
        let block = decode("Location: http://example.com:8080/\n").unwrap();
        assert_eq!(block.get("Location"), Some("http://example.com:8080/"));
    }

    #[test]
    fn decode_rejects_line_without_separator() {
        let err = decode("Good: yes\r\nbroken line\r\n").unwrap_err();
        match err {
            CodecError::InvalidHeaderLine { line, .. } => assert_eq!(line, "broken line"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(decode(": no name").is_err());
        assert!(decode("A: x\ry\r\n").is_err());
    }

    #[test]
    fn append_rejects_headers_that_would_not_round_trip() {
        let mut block = HeaderBlock::new();
        for (name, value) in [
            ("C", "x\r\nD: y"),
            ("C", "x\ny"),
            ("B", " padded"),
            ("B", "\tpadded"),
            ("", "v"),
            ("Na:me", "v"),
            ("Na\nme", "v"),
            (" Name", "v"),
            ("Name ", "v"),
        ] {
            let err = block.append(name, value).unwrap_err();
            assert!(
                matches!(err, CodecError::InvalidHeaderLine { .. }),
                "expected InvalidHeaderLine for {name:?}: {value:?}"
            );
        }
        assert!(block.is_empty());

        block.append("B", "padded ").unwrap();
        block.append("E", "").unwrap();
        assert_eq!(decode(&encode(&block)).unwrap(), block);
    }

    #[test]
    fn insert_requires_values() {
        let mut block = HeaderBlock::new();
        assert!(block.insert("A", vec![]).is_err());
        assert!(block.insert("A", vec!["ok".into(), "bad\r\n".into()]).is_err());
        assert!(block.is_empty());

        assert_eq!(block.insert("A", vec!["1".into()]).unwrap(), None);
        assert_eq!(block.insert("A", vec!["2".into()]).unwrap(), Some(vec!["1".to_string()]));
        assert_eq!(decode(&encode(&block)).unwrap(), block);
    }

    #[test]
    fn map_conversion_is_checked() {
        let good = IndexMap::from([("A".to_string(), vec!["1".to_string()])]);
        assert_eq!(HeaderBlock::try_from(good).unwrap().get("A"), Some("1"));

        let empty = IndexMap::from([("A".to_string(), Vec::new())]);
        assert!(HeaderBlock::try_from(empty).is_err());
    }

    #[test]
    fn equality_ignores_name_order() {
        let a = decode("A: 1\r\nB: 2\r\n").unwrap();
        let b = decode("B: 2\r\nA: 1\r\n").unwrap();
        assert!(semantically_equal(&a, &b));

        let c = decode("A: 1\r\nA: 2\r\n").unwrap();
        let d = decode("A: 2\r\nA: 1\r\n").unwrap();
        assert!(!semantically_equal(&c, &d));
    }

    #[test]
    fn build_from_pairs() {
        let block = HeaderBlock::from_pairs([("Accept", "*/*"), ("X-Trace", "1")]).unwrap();
        assert_eq!(block.get("Accept"), Some("*/*"));
        assert_eq!(block.get_all("Missing"), &[] as &[String]);

        assert!(HeaderBlock::from_pairs([("Accept", "*/*"), ("X-Bad", "a\nb")]).is_err());
    }
}
