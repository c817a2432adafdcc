//! Read-only views over blob bytes.

use grove_store::Blob;

use crate::binary::{classify, Classification, DEFAULT_SNIFF_LEN};
use crate::config::BlobConfig;
use crate::limit::Limit;
use crate::sloc::sloc;
use crate::text::{decode, line_prefix, TextEncoding};

/// Views over an immutable byte object.
///
/// Every method is pure: calling it twice on the same bytes gives the same
/// answer, and nothing is cached between calls.
pub trait BlobContent {
    /// The raw bytes.
    fn raw(&self) -> &[u8];

    /// Size in bytes.
    fn size(&self) -> usize {
        self.raw().len()
    }

    /// The first `min(size, max_bytes)` bytes, uninterpreted.
    fn content(&self, max_bytes: impl Into<Limit>) -> &[u8] {
        let raw = self.raw();
        &raw[..max_bytes.into().clamp(raw.len())]
    }

    /// The leading `max_lines` lines decoded as text.
    ///
    /// The text ends right after the `max_lines`-th `\n`; zero lines gives
    /// an empty string. `None` decodes as UTF-8.
    fn text(&self, max_lines: impl Into<Limit>, encoding: Option<TextEncoding>) -> String {
        decode(
            line_prefix(self.raw(), max_lines.into()),
            encoding.unwrap_or_default(),
        )
    }

    /// Like [`text`](Self::text), falling back to the configured default
    /// encoding.
    fn text_with(
        &self,
        max_lines: impl Into<Limit>,
        encoding: Option<TextEncoding>,
        config: &BlobConfig,
    ) -> String {
        self.text(max_lines, Some(encoding.unwrap_or(config.default_encoding)))
    }

    /// Number of non-blank lines. See [`sloc`](crate::sloc::sloc).
    fn sloc(&self) -> usize {
        sloc(self.raw())
    }

    /// Binary-vs-text over the first 4000 bytes.
    fn classify(&self) -> Classification {
        classify(self.raw(), DEFAULT_SNIFF_LEN)
    }

    /// Binary-vs-text over the configured sample length.
    fn classify_with(&self, config: &BlobConfig) -> Classification {
        classify(self.raw(), config.binary_sniff_len)
    }

    fn is_binary(&self) -> bool {
        self.classify().is_binary()
    }
}

impl BlobContent for Blob {
    fn raw(&self) -> &[u8] {
        &self.data
    }
}

impl BlobContent for [u8] {
    fn raw(&self) -> &[u8] {
        self
    }
}

impl BlobContent for Vec<u8> {
    fn raw(&self) -> &[u8] {
        self
    }
}
