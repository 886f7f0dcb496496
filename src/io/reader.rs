use crate::error::{Error, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

/// Upper bound on the buffer reserved ahead of a read.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;
/// Extra room reserved for the tail of the last line.
const LINE_SLACK: usize = 128;

/// Streams whole-line chunks out of a reader.
///
/// Each chunk is read as `chunk_size` bytes and then extended up to and
/// including the next `\n`, so a chunk never ends in the middle of a line.
/// Memory use is bounded by the chunk size plus one line.
pub struct ChunkReader<R> {
    inner: BufReader<R>,
    chunk_size: usize,
    name: PathBuf,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            chunk_size: chunk_size.max(1),
            name: PathBuf::from("<stream>"),
        }
    }

    /// Name reported in read errors.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<PathBuf>) -> Self {
        self.name = name.into();
        self
    }

    /// Read the next chunk, or `None` at end of input.
    ///
    /// # Errors
    /// [`Error::SourceRead`] if the underlying reader fails.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::with_capacity(self.chunk_size.min(MAX_PREALLOC) + LINE_SLACK);
        (&mut self.inner)
            .take(self.chunk_size as u64)
            .read_to_end(&mut buf)
            .map_err(|e| Error::source_read(&self.name, e))?;
        if buf.is_empty() {
            return Ok(None);
        }
        if buf.last() != Some(&b'\n') {
            self.inner
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::source_read(&self.name, e))?;
        }
        Ok(Some(buf))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
