//! Blob content engine for Grove.
//!
//! Reads views of immutable blob bytes and builds new blobs.
//!
//! # Reading
//!
//! [`BlobContent`] is implemented for [`grove_store::Blob`], `[u8]` and
//! `Vec<u8>`:
//!
//! - `content(max_bytes)` -- leading raw bytes
//! - `text(max_lines, encoding)` -- leading lines decoded as a `String`
//! - `sloc()` -- count of non-blank lines
//! - `classify()` / `is_binary()` -- bounded binary-vs-text heuristic
//!
//! Caps are [`Limit`]s; any integer converts, and negative values mean
//! "no limit".
//!
//! # Building
//!
//! [`BlobBuilder`] writes blobs from a buffer, a file, a working-directory
//! path, or a [`ChunkProvider`]. A provider that fails midway still yields a
//! blob holding everything received before the failure.

pub mod binary;
pub mod builder;
pub mod config;
pub mod content;
pub mod error;
pub mod limit;
pub mod provider;
pub mod sloc;
pub mod text;

pub use binary::{classify, Classification, DEFAULT_SNIFF_LEN};
pub use builder::BlobBuilder;
pub use config::BlobConfig;
pub use content::BlobContent;
pub use error::{BlobError, BlobResult};
pub use limit::Limit;
pub use provider::{Chunk, ChunkProvider, ProviderError, ReaderProvider};
pub use sloc::sloc;
pub use text::{decode, line_prefix, TextEncoding};
