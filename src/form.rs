use std::fmt::Debug;

use crate::source::BodySource;

/// An ordered collection of form fields. Insertion order is the order parts appear on the wire.
///
/// `'a` bounds the body sources of file fields, so a form may borrow readers it does not own.
#[derive(Debug, Default)]
pub struct Form<'a> {
    pub(crate) fields: Vec<Field<'a>>,
}

/// A named form field.
#[derive(Debug)]
pub struct Field<'a> {
    pub(crate) name: String,
    pub(crate) value: FieldValue<'a>,
}

/// The value carried by a [`Field`].
pub enum FieldValue<'a> {
    /// Text, encoded with the encoder's configured encoding.
    Text(String),
    /// Raw bytes, passed through unchanged.
    Bytes(Vec<u8>),
    /// A file-like body with optional filename, content type and extra headers.
    File(FileField<'a>),
}

/// A file-like field value streamed from a [`BodySource`].
pub struct FileField<'a> {
    pub(crate) filename: Option<String>,
    pub(crate) source: Box<dyn BodySource + 'a>,
    pub(crate) content_type: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
}

impl<'a> Form<'a> {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(Field::text(name, value))
    }

    /// Appends a field whose value is sent as raw bytes.
    pub fn bytes(self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.field(Field::bytes(name, value))
    }

    /// Appends a file field.
    pub fn file(self, name: impl Into<String>, file: FileField<'a>) -> Self {
        self.field(Field::file(name, file))
    }

    /// Appends a prebuilt field.
    pub fn field(mut self, field: Field<'a>) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a prebuilt field in place.
    pub fn push(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }

    /// Number of fields, counting duplicates.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over field names in wire order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let fields: &[Field<'_>] = &self.fields;
        fields.iter().map(Field::name)
    }
}

impl<'a> FromIterator<Field<'a>> for Form<'a> {
    fn from_iter<T: IntoIterator<Item = Field<'a>>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> Extend<Field<'a>> for Form<'a> {
    fn extend<T: IntoIterator<Item = Field<'a>>>(&mut self, iter: T) {
        self.fields.extend(iter);
    }
}

impl<'a> Field<'a> {
    /// Creates a field from a name and an already built value.
    pub fn new(name: impl Into<String>, value: FieldValue<'a>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldValue::Text(value.into()))
    }

    /// Creates a raw bytes field.
    pub fn bytes(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(name, FieldValue::Bytes(value.into()))
    }

    /// Creates a file field.
    pub fn file(name: impl Into<String>, file: FileField<'a>) -> Self {
        Self::new(name, FieldValue::File(file))
    }

    /// The field name, before escaping.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value.
    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }
}

impl<'a> FileField<'a> {
    /// Wraps `source`, which may be owned or borrowed for `'a`.
    ///
    /// The length of `source` is queried when the encoder is built; it is not read until the
    /// encoder reaches this field.
    pub fn new(source: impl BodySource + 'a) -> Self {
        Self {
            filename: None,
            source: Box::new(source),
            content_type: None,
            headers: vec![],
        }
    }

    /// Sets the `filename` parameter of `Content-Disposition`.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Adds a `Content-Type` header to the part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Adds an extra part header, emitted after `Content-Type` in insertion order.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The `filename` parameter, if set.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The part's `Content-Type`, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Extra headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => f.debug_tuple("FieldValue::Text").field(text).finish(),
            FieldValue::Bytes(bytes) => f.debug_tuple("FieldValue::Bytes").field(bytes).finish(),
            FieldValue::File(file) => f.debug_tuple("FieldValue::File").field(file).finish(),
        }
    }
}

impl Debug for FileField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileField")
            .field("filename", &self.filename)
            .field("content_length", &self.source.content_length())
            .field("content_type", &self.content_type)
            .field("headers", &self.headers)
            .finish()
    }
}
