//! A streaming `multipart/form-data` encoder.
//!
//! ## Overview
//!
//! `nyquest-multipart` serializes an ordered set of form fields into the `multipart/form-data`
//! wire format described in [RFC 7578] without buffering the whole payload. It is meant for
//! uploads where
//!
//! - the exact `Content-Length` must be known before the first byte is sent,
//! - file bodies should be read lazily, only when the transport asks for more bytes,
//! - the transport pulls data through [`std::io::Read`].
//!
//! The encoder only produces bytes. Sending them is up to the caller, typically by passing the
//! encoder as a request body stream whose length is [`MultipartEncoder::len`].
//!
//! ## Usage
//!
//! ```
//! use std::io::Read;
//! use nyquest_multipart::{FileField, Form, MultipartEncoder};
//!
//! let form = Form::new()
//!     .text("title", "holiday")
//!     .file(
//!         "photo",
//!         FileField::new(&b"\x89PNG..."[..])
//!             .with_filename("beach.png")
//!             .with_content_type("image/png"),
//!     );
//! let mut encoder = MultipartEncoder::new(form)?;
//! let content_type = encoder.content_type().to_owned();
//! let content_length = encoder.len();
//!
//! let mut sent = 0;
//! let mut buf = [0; 8192];
//! loop {
//!     let n = encoder.read(&mut buf)?;
//!     if n == 0 {
//!         break;
//!     }
//!     sent += n as u64; // hand buf[..n] to the transport
//! }
//! assert_eq!(sent, content_length);
//! assert!(content_type.starts_with("multipart/form-data; boundary="));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! File fields accept anything implementing [`BodySource`]: in-memory slices, [`std::io::Cursor`],
//! [`std::fs::File`], or any reader with a declared length through [`SizedReader`].
//!
//! ## Threading
//!
//! The encoder is `Send` but keeps unsynchronized cursor state; it must not be read from
//! several threads at once.
//!
//! [RFC 7578]: https://www.rfc-editor.org/rfc/rfc7578

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod boundary;
mod encoder;
mod error;
mod form;
mod monitor;
pub mod part;
pub mod source;

pub use boundary::{BoundaryGenerator, RandomBoundary};
pub use encoder::{EncoderBuilder, MultipartEncoder};
pub use error::{Error, Result};
pub use form::{Field, FieldValue, FileField, Form};
pub use monitor::{Monitor, Progress};
pub use source::{BodySource, SizedReader};
