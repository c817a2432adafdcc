use serde::{Deserialize, Serialize};

use crate::binary::DEFAULT_SNIFF_LEN;
use crate::text::TextEncoding;

/// Default number of bytes requested from a chunk provider per pull.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Tunables for reading and building blobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Leading bytes inspected by binary classification.
    pub binary_sniff_len: usize,
    /// Bytes requested per pull when building from chunks.
    pub chunk_size: usize,
    /// Encoding used when a text request names none.
    pub default_encoding: TextEncoding,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            binary_sniff_len: DEFAULT_SNIFF_LEN,
            chunk_size: DEFAULT_CHUNK_SIZE,
            default_encoding: TextEncoding::Utf8,
        }
    }
}
