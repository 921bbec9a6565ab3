//! Conversion of form fields into serialized parts.

use std::{borrow::Cow, fmt::Debug};

use encoding_rs::Encoding;

use crate::{
    form::{Field, FieldValue, FileField},
    source::BodySource,
    Error, Result,
};

/// One field's serialized header block plus its body.
pub struct Part<'a> {
    headers: Vec<u8>,
    body: PartBody<'a>,
}

/// The body of a [`Part`].
pub enum PartBody<'a> {
    /// Bytes known at construction time.
    Bytes(Vec<u8>),
    /// A source streamed lazily, with the length it reported when the part was built.
    Source {
        /// The source itself.
        source: Box<dyn BodySource + 'a>,
        /// Exact number of bytes that will be taken from `source`.
        len: u64,
    },
}

fn escape_quoted(value: &str) -> Cow<'_, str> {
    static SPECIAL_CHARS: &[char] = &['\\', '"', '\r', '\n'];
    if !value.contains(SPECIAL_CHARS) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn quick_escape_header<'a>(key: &'a str, value: &'a str) -> (Cow<'a, str>, Cow<'a, str>) {
    static NEW_LINE: &[char] = &['\r', '\n'];
    let mut key = Cow::Borrowed(key);
    let mut value = Cow::Borrowed(value);
    if key.contains(':') {
        key = key.replace(':', "%3A").into();
    }
    for s in [&mut key, &mut value] {
        if s.contains(NEW_LINE) {
            *s = s.replace(NEW_LINE, "\\n").into();
        }
    }
    (key, value)
}

fn encode_text(text: &str, field: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(Error::Unrepresentable {
            field: field.to_owned(),
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

/// Renders the header block of a part, including the blank line that ends it.
fn render_headers(
    name: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    extra_headers: &[(String, String)],
) -> String {
    let mut headers = String::with_capacity(64 + name.len());
    headers.push_str("Content-Disposition: form-data; name=\"");
    headers.push_str(&escape_quoted(name));
    headers.push('"');
    if let Some(filename) = filename {
        headers.push_str("; filename=\"");
        headers.push_str(&escape_quoted(filename));
        headers.push('"');
    }
    headers.push_str("\r\n");

    if let Some(content_type) = content_type {
        let (_, content_type) = quick_escape_header("", content_type);
        headers.push_str("Content-Type: ");
        headers.push_str(&content_type);
        headers.push_str("\r\n");
    }

    for (k, v) in extra_headers {
        let (k, v) = quick_escape_header(k, v);
        headers.push_str(&k);
        headers.push_str(": ");
        headers.push_str(&v);
        headers.push_str("\r\n");
    }

    headers.push_str("\r\n");
    headers
}

impl<'a> Part<'a> {
    /// Builds a part from `field`, encoding all text with `encoding`.
    ///
    /// File sources are asked for their length here and never read.
    pub fn from_field(field: Field<'a>, encoding: &'static Encoding) -> Result<Self> {
        let Field { name, value } = field;
        let (headers, body) = match value {
            FieldValue::Text(text) => (
                render_headers(&name, None, None, &[]),
                PartBody::Bytes(encode_text(&text, &name, encoding)?),
            ),
            FieldValue::Bytes(bytes) => (
                render_headers(&name, None, None, &[]),
                PartBody::Bytes(bytes),
            ),
            FieldValue::File(FileField {
                filename,
                source,
                content_type,
                headers,
            }) => {
                let Some(len) = source.content_length() else {
                    return Err(Error::UnknownLength { field: name });
                };
                (
                    render_headers(
                        &name,
                        filename.as_deref(),
                        content_type.as_deref(),
                        &headers,
                    ),
                    PartBody::Source { source, len },
                )
            }
        };
        Ok(Self {
            headers: encode_text(&headers, &name, encoding)?,
            body,
        })
    }

    /// The serialized header block, terminated by an empty line.
    pub fn headers(&self) -> &[u8] {
        &self.headers
    }

    /// The body, not yet read.
    pub fn body(&self) -> &PartBody<'a> {
        &self.body
    }

    /// Header and body bytes of this part, excluding delimiters.
    pub fn len(&self) -> u64 {
        self.headers.len() as u64 + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_inner(self) -> (Vec<u8>, PartBody<'a>) {
        (self.headers, self.body)
    }
}

impl PartBody<'_> {
    /// Number of body bytes, as declared when the part was built.
    pub fn len(&self) -> u64 {
        match self {
            PartBody::Bytes(bytes) => bytes.len() as u64,
            PartBody::Source { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for Part<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("headers", &String::from_utf8_lossy(&self.headers))
            .field("body", &self.body)
            .finish()
    }
}

impl Debug for PartBody<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartBody::Bytes(content) => f
                .debug_struct("PartBody::Bytes")
                .field("content", content)
                .finish(),
            PartBody::Source { len, .. } => f
                .debug_struct("PartBody::Source")
                .field("len", len)
                .finish_non_exhaustive(),
        }
    }
}
