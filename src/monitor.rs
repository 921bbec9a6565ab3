//! Upload progress reporting.

use std::io::{self, Read};

use crate::{Form, MultipartEncoder, Result};

/// Snapshot passed to a [`Monitor`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes handed out so far.
    pub bytes_read: u64,
    /// Total length of the body.
    pub len: u64,
}

impl Progress {
    /// Whether the whole body has been read.
    pub fn finished(&self) -> bool {
        self.bytes_read == self.len
    }
}

/// Wraps a [`MultipartEncoder`] and invokes a callback after every successful read.
pub struct Monitor<'a, F> {
    encoder: MultipartEncoder<'a>,
    callback: F,
}

impl<'a, F: FnMut(&Progress)> Monitor<'a, F> {
    /// Monitors `encoder`, calling `callback` after each read.
    pub fn new(encoder: MultipartEncoder<'a>, callback: F) -> Self {
        Self { encoder, callback }
    }

    /// Builds a default encoder for `form` and monitors it.
    pub fn from_form(form: Form<'a>, callback: F) -> Result<Self> {
        Ok(Self::new(MultipartEncoder::new(form)?, callback))
    }

    /// The wrapped encoder.
    pub fn encoder(&self) -> &MultipartEncoder<'a> {
        &self.encoder
    }

    pub fn content_type(&self) -> &str {
        self.encoder.content_type()
    }

    pub fn len(&self) -> u64 {
        self.encoder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder.is_empty()
    }

    pub fn bytes_read(&self) -> u64 {
        self.encoder.bytes_read()
    }

    pub fn finished(&self) -> bool {
        self.encoder.finished()
    }

    /// Stops monitoring and returns the encoder.
    pub fn into_inner(self) -> MultipartEncoder<'a> {
        self.encoder
    }
}

impl<F: FnMut(&Progress)> Read for Monitor<'_, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.encoder.read(buf)?;
        (self.callback)(&Progress {
            bytes_read: self.encoder.bytes_read(),
            len: self.encoder.len(),
        });
        Ok(n)
    }
}
