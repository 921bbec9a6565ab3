use thiserror::Error;

/// The errors produced while building or reading a multipart body.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The form has no fields to encode.
    #[error("Multipart form has no fields")]
    EmptyForm,
    /// The explicit boundary is empty, too long or contains characters that would need quoting
    /// in the `Content-Type` header.
    #[error("Invalid multipart boundary {0:?}")]
    InvalidBoundary(String),
    /// A file field's body source cannot report how many bytes it will yield.
    #[error("Body source of field {field:?} does not report its length")]
    UnknownLength {
        /// Name of the offending field.
        field: String,
    },
    /// The header, body and delimiter lengths add up to more than `u64::MAX` bytes.
    #[error("Multipart body length overflows u64")]
    LengthOverflow,
    /// The encoding label is not recognized.
    #[error("Unsupported text encoding {0:?}")]
    UnsupportedEncoding(String),
    /// Some text of a field cannot be represented in the configured encoding.
    #[error("Field {field:?} cannot be represented in {encoding}")]
    Unrepresentable {
        /// Name of the offending field.
        field: String,
        /// Name of the configured encoding.
        encoding: &'static str,
    },
    /// A body source has failed while being read.
    #[error("IO Error")]
    Io(#[from] std::io::Error),
}

/// A `Result` alias where the `Err` case is [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;
