//! Pull-based chunk sources for building blobs.

use std::io::{self, Read};

/// Error reported by a failing provider.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// One pull from a [`ChunkProvider`].
#[derive(Debug)]
pub enum Chunk {
    /// Bytes to append. An empty chunk ends the stream.
    Data(Vec<u8>),
    /// No more data.
    End,
    /// The source failed. Bytes already delivered are kept.
    Failed(ProviderError),
}

/// A source of blob content, pulled one chunk at a time.
pub trait ChunkProvider {
    /// Produce at most `max_len` bytes.
    fn next_chunk(&mut self, max_len: usize) -> Chunk;
}

impl<F> ChunkProvider for F
where
    F: FnMut(usize) -> Chunk,
{
    fn next_chunk(&mut self, max_len: usize) -> Chunk {
        self(max_len)
    }
}

/// Adapts any [`io::Read`] into a provider.
///
/// Interrupted reads are retried; any other read error becomes
/// [`Chunk::Failed`].
#[derive(Debug)]
pub struct ReaderProvider<R> {
    reader: R,
}

impl<R: Read> ReaderProvider<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ChunkProvider for ReaderProvider<R> {
    fn next_chunk(&mut self, max_len: usize) -> Chunk {
        let mut buf = vec![0u8; max_len];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Chunk::End,
                Ok(n) => {
                    buf.truncate(n);
                    return Chunk::Data(buf);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Chunk::Failed(Box::new(e)),
            }
        }
    }
}
