//! The streaming multipart encoder.

use std::{
    collections::VecDeque,
    fmt::Debug,
    io::{self, Read},
};

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, trace};

use crate::{
    boundary::{validate_boundary, BoundaryGenerator, RandomBoundary},
    form::Form,
    part::{Part, PartBody},
    source::BodySource,
    Error, Result,
};

/// Configures and builds a [`MultipartEncoder`].
#[derive(Default)]
pub struct EncoderBuilder {
    boundary: Option<String>,
    encoding: Option<String>,
    generator: Option<Box<dyn BoundaryGenerator>>,
}

impl EncoderBuilder {
    /// Uses `boundary` verbatim instead of generating one.
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Sets the label of the encoding used for header text and text values. Defaults to `utf-8`.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Replaces the default [`RandomBoundary`] generator. Ignored if an explicit boundary is set.
    pub fn boundary_generator(mut self, generator: impl BoundaryGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Builds the encoder, computing the exact body length without reading any source.
    pub fn build<'a>(self, form: Form<'a>) -> Result<MultipartEncoder<'a>> {
        if form.is_empty() {
            return Err(Error::EmptyForm);
        }
        let encoding = match self.encoding {
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or(Error::UnsupportedEncoding(label))?
                .output_encoding(),
            None => UTF_8,
        };
        let boundary = match (self.boundary, self.generator) {
            (Some(boundary), _) => boundary,
            (None, Some(mut generator)) => generator.generate(),
            (None, None) => RandomBoundary::new().generate(),
        };
        validate_boundary(&boundary)?;

        let field_count = form.len();
        let parts = form
            .fields
            .into_iter()
            .map(|field| Part::from_field(field, encoding))
            .collect::<Result<Vec<_>>>()?;

        let mut segments = SegmentsBuilder::default();
        for (i, part) in parts.into_iter().enumerate() {
            if i == 0 {
                segments.push_bytes(b"--")?;
            } else {
                segments.push_bytes(b"\r\n--")?;
            }
            segments.push_bytes(boundary.as_bytes())?;
            segments.push_bytes(b"\r\n")?;
            let (headers, body) = part.into_inner();
            segments.push_bytes(&headers)?;
            match body {
                PartBody::Bytes(content) => segments.push_bytes(&content)?,
                PartBody::Source { source, len } => segments.push_source(source, len)?,
            }
        }
        segments.push_bytes(b"\r\n--")?;
        segments.push_bytes(boundary.as_bytes())?;
        segments.push_bytes(b"--\r\n")?;
        let (segments, len) = segments.finish();

        debug!(
            fields = field_count,
            len,
            boundary = %boundary,
            encoding = encoding.name(),
            "multipart encoder built"
        );

        Ok(MultipartEncoder {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            boundary,
            encoding,
            len,
            bytes_read: 0,
            finished: false,
            segments,
            deferred_error: None,
        })
    }
}

impl Debug for EncoderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderBuilder")
            .field("boundary", &self.boundary)
            .field("encoding", &self.encoding)
            .field("custom_generator", &self.generator.is_some())
            .finish()
    }
}

enum Segment<'a> {
    Bytes {
        content: Vec<u8>,
        pos: usize,
    },
    Source {
        source: Box<dyn BodySource + 'a>,
        remaining: u64,
    },
}

impl Segment<'_> {
    /// Copies bytes into `buf`. `Ok(0)` means the segment is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Segment::Bytes { content, pos } => {
                let rest = &content[*pos..];
                let n = rest.len().min(buf.len());
                buf[..n].copy_from_slice(&rest[..n]);
                *pos += n;
                Ok(n)
            }
            Segment::Source { source, remaining } => {
                if *remaining == 0 {
                    return Ok(0);
                }
                let cap = (*remaining).min(buf.len() as u64) as usize;
                loop {
                    match source.read(&mut buf[..cap]) {
                        Ok(0) if cap > 0 => {
                            return Err(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                format!("body source ended {remaining} bytes before its declared length"),
                            ));
                        }
                        Ok(n) => {
                            *remaining -= n as u64;
                            return Ok(n);
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }
}

/// Coalesces adjacent in-memory bytes so the reader only switches segments at source edges.
#[derive(Default)]
struct SegmentsBuilder<'a> {
    segments: VecDeque<Segment<'a>>,
    pending: Vec<u8>,
    len: u64,
}

impl<'a> SegmentsBuilder<'a> {
    fn grow(&mut self, len: u64) -> Result<()> {
        self.len = self.len.checked_add(len).ok_or(Error::LengthOverflow)?;
        Ok(())
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.grow(bytes.len() as u64)?;
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    fn push_source(&mut self, source: Box<dyn BodySource + 'a>, len: u64) -> Result<()> {
        self.grow(len)?;
        self.flush();
        self.segments.push_back(Segment::Source {
            source,
            remaining: len,
        });
        Ok(())
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.segments.push_back(Segment::Bytes {
                content: std::mem::take(&mut self.pending),
                pos: 0,
            });
        }
    }

    fn finish(mut self) -> (VecDeque<Segment<'a>>, u64) {
        self.flush();
        (self.segments, self.len)
    }
}

/// Streams a [`Form`] as a `multipart/form-data` body.
///
/// The total length is known as soon as the encoder is built. Bytes are produced lazily through
/// [`Read`] or [`MultipartEncoder::read_chunk`]; file sources are only read when the cursor
/// reaches them and never again once exhausted. The encoder never rewinds a source; owned sources
/// are dropped once exhausted, so lend them as `&mut S` to keep using them afterwards. The
/// encoder is single-pass: once
/// [`finished`](MultipartEncoder::finished) every read yields nothing.
///
/// ```
/// use nyquest_multipart::{FileField, Form, MultipartEncoder};
///
/// let form = Form::new()
///     .text("a", "1")
///     .file("b", FileField::new(&b"hello"[..]).with_filename("f.txt").with_content_type("text/plain"));
/// let mut encoder = MultipartEncoder::builder().boundary("X").build(form)?;
/// assert_eq!(encoder.content_type(), "multipart/form-data; boundary=X");
/// let body = encoder.to_bytes()?;
/// assert_eq!(body.len() as u64, encoder.len());
/// assert!(encoder.finished());
/// # Ok::<_, nyquest_multipart::Error>(())
/// ```
pub struct MultipartEncoder<'a> {
    boundary: String,
    content_type: String,
    encoding: &'static Encoding,
    len: u64,
    bytes_read: u64,
    finished: bool,
    segments: VecDeque<Segment<'a>>,
    deferred_error: Option<io::Error>,
}

/// Upper bound of the buffer [`MultipartEncoder::to_bytes`] reserves up front.
const MAX_PREALLOC: u64 = 1 << 20;

impl<'a> MultipartEncoder<'a> {
    /// Builds an encoder with a random boundary and UTF-8 text.
    pub fn new(form: Form<'a>) -> Result<Self> {
        Self::builder().build(form)
    }

    /// Starts configuring an encoder with an explicit boundary, encoding or boundary generator.
    pub fn builder() -> EncoderBuilder {
        EncoderBuilder::default()
    }

    /// The `Content-Type` header value, including the boundary parameter.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The boundary delimiting parts, without the leading `--`.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Name of the encoding header text and text values are written in.
    ///
    /// This is the output encoding of the configured label, so `utf-16` reports `UTF-8`.
    pub fn encoding(&self) -> &'static str {
        self.encoding.name()
    }

    /// Total number of bytes the encoder emits over its lifetime.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Always `false`: even the smallest form carries its delimiters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Bytes still to be handed out.
    pub fn remaining(&self) -> u64 {
        self.len - self.bytes_read
    }

    /// Whether every byte has been handed out.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Reads up to `size` bytes, or everything left if `size` is `None`.
    ///
    /// The result is shorter than requested only at the end of the body or when a source fails
    /// after some bytes were produced; in the latter case the error is returned by the next call.
    pub fn read_chunk(&mut self, size: Option<usize>) -> Result<Vec<u8>> {
        let Some(size) = size else {
            return self.to_bytes();
        };
        let cap = (size as u64).min(self.remaining()) as usize;
        let mut chunk = vec![0; cap];
        let n = self.read(&mut chunk)?;
        chunk.truncate(n);
        Ok(chunk)
    }

    /// Collects the rest of the body into memory.
    ///
    /// This defeats streaming and allocates the whole remaining payload, so it is meant for
    /// small forms and tests. If a source fails after some bytes were collected, those bytes
    /// are returned and the error is reported by the next read.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let prealloc = usize::try_from(self.remaining().min(MAX_PREALLOC)).unwrap_or(usize::MAX);
        let mut body = Vec::with_capacity(prealloc);
        while !self.finished {
            let start = body.len();
            let step = usize::try_from(self.remaining().min(MAX_PREALLOC)).unwrap_or(usize::MAX);
            body.resize(start + step, 0);
            match self.read(&mut body[start..]) {
                Ok(0) => {
                    body.truncate(start);
                    break;
                }
                Ok(n) => body.truncate(start + n),
                Err(e) => {
                    body.truncate(start);
                    if body.is_empty() {
                        return Err(e.into());
                    }
                    self.deferred_error = Some(e);
                    break;
                }
            }
        }
        Ok(body)
    }

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            let Some(segment) = self.segments.front_mut() else {
                break;
            };
            match segment.read(&mut buf[written..]) {
                Ok(0) => {
                    self.segments.pop_front();
                    trace!(
                        bytes_read = self.bytes_read + written as u64,
                        segments_left = self.segments.len(),
                        "multipart segment exhausted"
                    );
                }
                Ok(n) => written += n,
                Err(e) if written > 0 => {
                    self.deferred_error = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }
}

impl Read for MultipartEncoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(e) = self.deferred_error.take() {
            return Err(e);
        }
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        let n = self.fill(buf)?;
        self.bytes_read += n as u64;
        if self.bytes_read == self.len {
            self.finished = true;
            self.segments.clear();
            debug!(len = self.len, "multipart body finished");
        }
        Ok(n)
    }
}

impl Debug for MultipartEncoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartEncoder")
            .field("boundary", &self.boundary)
            .field("encoding", &self.encoding.name())
            .field("len", &self.len)
            .field("bytes_read", &self.bytes_read)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

mod trait_assert {
    trait _AssertMarker: Send {}
    impl _AssertMarker for super::MultipartEncoder<'_> {}
}
