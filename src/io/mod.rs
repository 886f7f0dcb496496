//! Line sources.
//!
//! The aggregation core consumes raw bytes laid out as `\n`-terminated lines.
//! This module provides the adapters that hand those bytes over:
//!
//! - [`ByteSource`]: a read-only view of a whole input, shared by every worker.
//!   Implemented for byte slices, strings and [`MappedFile`].
//! - [`ChunkReader`]: streams whole-line chunks out of any [`std::io::Read`]
//!   for inputs that cannot be mapped (pipes, stdin).
//! - [`split_partitions`]: cuts a byte view into contiguous partitions that
//!   never split a line.
//! - [`lines`]: allocation-free line iteration over one partition.

mod mmap;
mod reader;

use memchr::memchr;

pub use mmap::MappedFile;
pub use reader::ChunkReader;

/// A read-only view of a whole input.
pub trait ByteSource: Sync {
    fn bytes(&self) -> &[u8];
}

impl ByteSource for [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for str {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ByteSource for String {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn bytes(&self) -> &[u8] {
        (**self).bytes()
    }
}

/// Split `bytes` into at most `n` contiguous, non-overlapping partitions that
/// together cover the input.
///
/// Every partition except possibly the last ends right after a `\n`, so no
/// line is ever split across two partitions. Empty input yields no partitions.
///
/// ```
/// use ironbrc::io::split_partitions;
///
/// let parts = split_partitions(b"a;1.0\nb;2.0\nc;3.0\n", 2);
/// assert_eq!(parts, vec![&b"a;1.0\nb;2.0\n"[..], &b"c;3.0\n"[..]]);
/// ```
#[must_use]
pub fn split_partitions(bytes: &[u8], n: usize) -> Vec<&[u8]> {
    let target = bytes.len().div_ceil(n.max(1));
    let mut parts = Vec::with_capacity(n.max(1));
    let mut start = 0;

    while start < bytes.len() {
        let ideal = start + target;
        let end = if ideal >= bytes.len() {
            bytes.len()
        } else {
            // Search from the last byte of the ideal span so a partition that
            // already ends on `\n` is not extended by another line.
            memchr(b'\n', &bytes[ideal - 1..]).map_or(bytes.len(), |i| ideal + i)
        };
        parts.push(&bytes[start..end]);
        start = end;
    }
    parts
}

/// Iterate the lines of `chunk`, without their `\n` (or `\r\n`) terminator.
///
/// A final line without a terminator is still yielded.
///
/// ```
/// use ironbrc::io::lines;
///
/// let got: Vec<&[u8]> = lines(b"a;1.0\r\nb;2.0").collect();
/// assert_eq!(got, vec![&b"a;1.0"[..], &b"b;2.0"[..]]);
/// ```
#[must_use]
pub fn lines(chunk: &[u8]) -> Lines<'_> {
    Lines { rest: chunk }
}

/// Iterator returned by [`lines`].
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }
        let line = match memchr(b'\n', self.rest) {
            Some(i) => {
                let line = &self.rest[..i];
                self.rest = &self.rest[i + 1..];
                line
            }
            None => std::mem::take(&mut self.rest),
        };
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }
}
