//! Store-side content filters.
//!
//! A filter rewrites blob bytes on their way into the store, keyed on the
//! working-tree path the bytes came from. Filters only run when a write
//! carries a hint path.

/// Transforms content before it is stored.
pub trait ContentFilter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this filter applies to content from `hint_path`.
    fn applies_to(&self, hint_path: &str) -> bool;

    /// Produce the bytes to store.
    fn clean(&self, hint_path: &str, data: Vec<u8>) -> Vec<u8>;
}

/// Normalises CRLF line endings to LF for paths with matching extensions.
///
/// Data containing a NUL byte is treated as binary and left untouched. A
/// lone CR is preserved.
#[derive(Clone, Debug)]
pub struct CrlfFilter {
    extensions: Vec<String>,
}

impl CrlfFilter {
    /// Filter for the given extensions (without the leading dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

impl Default for CrlfFilter {
    fn default() -> Self {
        Self::new(["txt", "md", "rs", "toml", "c", "h", "py", "rb", "js"])
    }
}

impl ContentFilter for CrlfFilter {
    fn name(&self) -> &str {
        "crlf"
    }

    fn applies_to(&self, hint_path: &str) -> bool {
        let file_name = hint_path.rsplit('/').next().unwrap_or(hint_path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            _ => false,
        }
    }

    fn clean(&self, _hint_path: &str, data: Vec<u8>) -> Vec<u8> {
        if data.contains(&0) || !data.windows(2).any(|w| w == b"\r\n") {
            return data;
        }
        let mut out = Vec::with_capacity(data.len());
        let mut iter = data.iter().peekable();
        while let Some(&b) = iter.next() {
            if b == b'\r' && iter.peek() == Some(&&b'\n') {
                continue;
            }
            out.push(b);
        }
        out
    }
}
