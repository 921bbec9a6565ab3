#![cfg(test)]

use std::io;

use bytes::Bytes;
use futures::{executor::block_on, stream};
use multer::Multipart;

mod fixtures;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FormItem {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    content_lang: Option<String>,
    bytes: Bytes,
}

impl FormItem {
    fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_owned(),
            bytes: Bytes::copy_from_slice(value.as_bytes()),
            ..Default::default()
        }
    }
}

/// Parses a multipart body delivered as the given sequence of chunks.
fn parse_chunks(content_type: &str, chunks: Vec<Vec<u8>>) -> Vec<FormItem> {
    let boundary = multer::parse_boundary(content_type).expect("boundary not found");
    let body_stream = stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok::<_, io::Error>(Bytes::from(chunk))),
    );
    let mut multipart = Multipart::new(body_stream, boundary);
    block_on(async move {
        let mut form_items = vec![];
        while let Some(field) = multipart.next_field().await.expect("malformed multipart body") {
            form_items.push(FormItem {
                name: field.name().unwrap_or_default().to_owned(),
                file_name: field.file_name().map(ToOwned::to_owned),
                content_type: field.content_type().map(|mime| mime.to_string()),
                content_lang: field
                    .headers()
                    .get("content-language")
                    .map(|v| v.to_str().unwrap_or_default().to_owned()),
                bytes: field.bytes().await.expect("failed to read field bytes"),
            });
        }
        form_items
    })
}

fn parse_body(content_type: &str, body: Vec<u8>) -> Vec<FormItem> {
    parse_chunks(content_type, vec![body])
}
