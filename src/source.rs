//! Byte sources backing file fields.

use std::{
    fs::File,
    io::{self, Cursor, Read, Seek},
};

/// A readable body that knows how many bytes it will yield before being read.
///
/// The encoder needs the exact size of every source up front to report the total length of the
/// multipart body. Implementations returning `None` are rejected when the encoder is built.
pub trait BodySource: Read + Send {
    /// Number of bytes remaining from the current position to the end of the source.
    fn content_length(&self) -> Option<u64>;
}

impl<S: BodySource + ?Sized> BodySource for Box<S> {
    fn content_length(&self) -> Option<u64> {
        (**self).content_length()
    }
}

impl<S: BodySource + ?Sized> BodySource for &mut S {
    fn content_length(&self) -> Option<u64> {
        (**self).content_length()
    }
}

impl BodySource for &[u8] {
    fn content_length(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

impl<T: AsRef<[u8]> + Send> BodySource for Cursor<T> {
    fn content_length(&self) -> Option<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        Some(len.saturating_sub(self.position()))
    }
}

impl BodySource for File {
    fn content_length(&self) -> Option<u64> {
        let len = self.metadata().ok()?.len();
        let mut file = self;
        let position = file.stream_position().ok()?;
        Some(len.saturating_sub(position))
    }
}

/// Attaches a caller-declared length to an arbitrary reader.
///
/// The encoder never reads more than `len` bytes from `reader`, and fails with
/// [`io::ErrorKind::UnexpectedEof`] if the reader ends earlier.
#[derive(Debug)]
pub struct SizedReader<R> {
    reader: R,
    len: u64,
}

impl<R> SizedReader<R> {
    /// Declares that `reader` yields at least `len` bytes.
    pub fn new(reader: R, len: u64) -> Self {
        Self { reader, len }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read + Send> BodySource for SizedReader<R> {
    fn content_length(&self) -> Option<u64> {
        Some(self.len)
    }
}
