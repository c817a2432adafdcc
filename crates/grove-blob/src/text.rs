//! Line-bounded text extraction.

use serde::{Deserialize, Serialize};

use crate::limit::Limit;

/// How blob bytes are decoded into a `String`.
///
/// Decoding never fails: bytes that do not fit the encoding become
/// U+FFFD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-8; invalid sequences become U+FFFD.
    #[default]
    Utf8,
    /// 7-bit ASCII; bytes above 0x7F become U+FFFD.
    Ascii,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
}

/// Decode bytes under `encoding`.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        TextEncoding::Ascii => bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
            .collect(),
        TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// The leading bytes of `data` up to and including the `max_lines`-th
/// `\n`.
///
/// With fewer newlines than requested, or an unbounded limit, the whole
/// buffer is returned. A limit of zero returns nothing.
pub fn line_prefix(data: &[u8], max_lines: Limit) -> &[u8] {
    match max_lines {
        Limit::Unbounded => data,
        Limit::AtMost(0) => &[],
        Limit::AtMost(n) => data
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(n - 1)
            .map_or(data, |(i, _)| &data[..=i]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefix_ends_after_nth_newline() {
        let data = b"one\ntwo\nthree\nfour";
        assert_eq!(line_prefix(data, Limit::AtMost(1)), b"one\n");
        assert_eq!(line_prefix(data, Limit::AtMost(3)), b"one\ntwo\nthree\n");
        assert_eq!(line_prefix(data, Limit::AtMost(10)), data);
        assert_eq!(line_prefix(data, Limit::Unbounded), data);
    }

    #[test]
    fn zero_lines_is_empty() {
        assert_eq!(line_prefix(b"abc\n", Limit::AtMost(0)), b"");
    }

    #[test]
    fn blank_lines_count() {
        assert_eq!(line_prefix(b"\n\nx\n", Limit::AtMost(2)), b"\n\n");
    }

    #[test]
    fn decode_utf8_is_lossy() {
        assert_eq!(decode(b"caf\xc3\xa9", TextEncoding::Utf8), "café");
        assert_eq!(decode(b"a\xffb", TextEncoding::Utf8), "a\u{fffd}b");
    }

    #[test]
    fn decode_ascii_replaces_high_bytes() {
        assert_eq!(decode(b"caf\xc3\xa9", TextEncoding::Ascii), "caf\u{fffd}\u{fffd}");
    }

    #[test]
    fn decode_latin1_maps_bytes_to_code_points() {
        assert_eq!(decode(b"caf\xe9", TextEncoding::Latin1), "café");
    }

    proptest! {
        #[test]
        fn prefix_holds_at_most_n_newlines(
            data in proptest::collection::vec(any::<u8>(), 0..256),
            n in 0usize..20,
        ) {
            let prefix = line_prefix(&data, Limit::AtMost(n));
            prop_assert!(data.starts_with(prefix));
            prop_assert!(prefix.iter().filter(|&&b| b == b'\n').count() <= n);
            if n > 0 && prefix.len() < data.len() {
                prop_assert_eq!(prefix.last(), Some(&b'\n'));
            }
        }
    }
}
