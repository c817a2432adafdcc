//! Binary-vs-text classification.
//!
//! Looks only at a bounded sample from the start of the content:
//!
//! 1. A UTF-16 or UTF-32 byte-order mark means binary. A UTF-8 BOM is
//!    skipped.
//! 2. Any NUL byte means binary.
//! 3. Otherwise count printable bytes (above 0x1F except DEL, plus BS, ESC
//!    and FF) and non-printable bytes (everything else that is not ASCII
//!    whitespace). More than one non-printable byte per 128 printable ones
//!    means binary.

use serde::{Deserialize, Serialize};

use crate::sloc::is_space;

/// How many leading bytes are inspected by default.
pub const DEFAULT_SNIFF_LEN: usize = 4000;

/// Result of [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Binary,
    Text,
}

impl Classification {
    pub fn is_binary(self) -> bool {
        self == Classification::Binary
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const WIDE_BOMS: &[&[u8]] = &[
    &[0x00, 0x00, 0xFE, 0xFF],
    &[0xFF, 0xFE, 0x00, 0x00],
    &[0xFE, 0xFF],
    &[0xFF, 0xFE],
];

fn is_printable(b: u8) -> bool {
    (b > 0x1F && b != 0x7F) || b == 0x08 || b == 0x1B || b == 0x0C
}

/// Classify the first `sniff_len` bytes of `data`. Empty content is text.
pub fn classify(data: &[u8], sniff_len: usize) -> Classification {
    let sample = &data[..data.len().min(sniff_len)];
    if WIDE_BOMS.iter().any(|bom| sample.starts_with(bom)) {
        return Classification::Binary;
    }
    let body = sample.strip_prefix(UTF8_BOM).unwrap_or(sample);

    let mut printable = 0usize;
    let mut non_printable = 0usize;
    for &b in body {
        if is_printable(b) {
            printable += 1;
        } else if b == 0 {
            return Classification::Binary;
        } else if !is_space(b) {
            non_printable += 1;
        }
    }

    if (printable >> 7) < non_printable {
        Classification::Binary
    } else {
        Classification::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn check(data: &[u8]) -> Classification {
        classify(data, DEFAULT_SNIFF_LEN)
    }

    #[test]
    fn empty_is_text() {
        assert_eq!(check(b""), Classification::Text);
    }

    #[test]
    fn plain_text_and_whitespace() {
        assert_eq!(check(b"fn main() {\n\tprintln!(\"hi\");\r\n}\x0b\x0c"), Classification::Text);
    }

    #[test]
    fn nul_byte_is_binary() {
        assert_eq!(check(b"text\0more"), Classification::Binary);
    }

    #[test]
    fn nul_beyond_sample_is_ignored() {
        let mut data = vec![b'a'; 100];
        data.push(0);
        assert_eq!(classify(&data, 100), Classification::Text);
        assert_eq!(classify(&data, 101), Classification::Binary);
    }

    #[test]
    fn wide_boms_are_binary() {
        assert_eq!(check(&[0xFF, 0xFE, b'h', 0x00]), Classification::Binary);
        assert_eq!(check(&[0xFE, 0xFF, 0x00, b'h']), Classification::Binary);
        assert_eq!(check(&[0xFF, 0xFE]), Classification::Binary);
    }

    #[test]
    fn utf8_bom_is_skipped() {
        // BOM bytes do not count toward the printable budget.
        let mut data = UTF8_BOM.to_vec();
        data.extend(std::iter::repeat(b'x').take(125));
        data.push(0x01);
        assert_eq!(check(&data), Classification::Binary);

        let mut plain = vec![b'x'; 128];
        plain.push(0x01);
        assert_eq!(check(&plain), Classification::Text);
    }

    #[test]
    fn threshold_is_one_control_byte_per_128_printable() {
        let mut data = vec![b'x'; 128];
        data.push(0x01);
        assert_eq!(check(&data), Classification::Text);
        data.push(0x02);
        assert_eq!(check(&data), Classification::Binary);

        // Fewer than 128 printable bytes tolerate no control bytes.
        assert_eq!(check(b"abc\x01"), Classification::Binary);
    }

    #[test]
    fn escape_sequences_count_as_printable() {
        assert_eq!(check(b"\x1b[31mred\x1b[0m\x08"), Classification::Text);
    }

    #[test]
    fn high_bytes_are_printable() {
        assert_eq!(check("héllo wörld".as_bytes()), Classification::Text);
    }

    proptest! {
        #[test]
        fn any_sample_with_nul_is_binary(
            prefix in proptest::collection::vec(any::<u8>(), 0..512),
            suffix in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let mut data = prefix;
            data.push(0);
            data.extend(suffix);
            prop_assert_eq!(check(&data), Classification::Binary);
        }

        #[test]
        fn printable_ascii_is_text(s in "[ -~\t\r\n]{0,2000}") {
            prop_assert_eq!(check(s.as_bytes()), Classification::Text);
        }

        #[test]
        fn only_the_sample_matters(
            head in proptest::collection::vec(any::<u8>(), 0..200),
            tail in proptest::collection::vec(any::<u8>(), 0..200),
        ) {
            let mut data = head.clone();
            data.extend(tail);
            prop_assert_eq!(classify(&data, head.len()), check(&head));
        }
    }
}
