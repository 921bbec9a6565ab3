#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Bytes;
    use nyquest_multipart::{FileField, Form, MultipartEncoder};

    use crate::*;

    #[test]
    fn test_round_trip_mixed_fields() {
        let form = Form::new()
            .text("text", "ttt")
            .file(
                "filename",
                FileField::new(&b"ID3"[..])
                    .with_filename("3253212.mp3")
                    .with_content_type("audio/mpeg"),
            )
            .file(
                "headed",
                FileField::new(Cursor::new("head"))
                    .with_content_type("text/plain")
                    .with_header("content-language", "zh-CN"),
            )
            .bytes("text", b"second value".to_vec());
        let mut encoder = MultipartEncoder::new(form).unwrap();
        let content_type = encoder.content_type().to_owned();
        let body = encoder.to_bytes().unwrap();
        assert_eq!(body.len() as u64, encoder.len());

        let items = parse_body(&content_type, body);
        assert_eq!(
            items,
            [
                FormItem::text("text", "ttt"),
                FormItem {
                    name: "filename".to_owned(),
                    file_name: Some("3253212.mp3".to_owned()),
                    content_type: Some("audio/mpeg".to_owned()),
                    content_lang: None,
                    bytes: Bytes::from_static(b"ID3"),
                },
                FormItem {
                    name: "headed".to_owned(),
                    file_name: None,
                    content_type: Some("text/plain".to_owned()),
                    content_lang: Some("zh-CN".to_owned()),
                    bytes: Bytes::from_static(b"head"),
                },
                FormItem::text("text", "second value"),
            ]
        );
    }

    #[test]
    fn test_round_trip_binary_body() {
        let payload: Vec<u8> = (0..=255u8).chain(*b"\r\n--\r\n\r\n").collect();
        let form = Form::new()
            .bytes("raw", payload.clone())
            .file(
                "blob",
                FileField::new(Cursor::new(payload.clone()))
                    .with_filename("blob.bin")
                    .with_content_type("application/octet-stream"),
            );
        let mut encoder = MultipartEncoder::new(form).unwrap();
        let content_type = encoder.content_type().to_owned();
        let items = parse_body(&content_type, encoder.to_bytes().unwrap());

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].bytes, payload);
        assert_eq!(items[1].bytes, payload);
        assert_eq!(items[1].file_name.as_deref(), Some("blob.bin"));
    }

    #[test]
    fn test_round_trip_empty_values() {
        let form = Form::new()
            .text("empty", "")
            .file("nothing", FileField::new(&b""[..]).with_filename("empty.txt"));
        let mut encoder = MultipartEncoder::builder()
            .boundary("empty-values")
            .build(form)
            .unwrap();
        let items = parse_body(
            "multipart/form-data; boundary=empty-values",
            encoder.to_bytes().unwrap(),
        );
        assert_eq!(
            items,
            [
                FormItem::text("empty", ""),
                FormItem {
                    name: "nothing".to_owned(),
                    file_name: Some("empty.txt".to_owned()),
                    ..Default::default()
                },
            ]
        );
    }

    #[test]
    fn test_two_field_example_parses() {
        let form = Form::new().text("a", "1").file(
            "b",
            FileField::new(&b"hello"[..])
                .with_filename("f.txt")
                .with_content_type("text/plain"),
        );
        let mut encoder = MultipartEncoder::builder().boundary("X").build(form).unwrap();
        let body = encoder.to_bytes().unwrap();
        assert_eq!(
            body,
            b"--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--X\r\nContent-Disposition: form-data; name=\"b\"; filename=\"f.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--\r\n"
        );
        let items = parse_body(encoder.content_type(), body);
        assert_eq!(items[0], FormItem::text("a", "1"));
        assert_eq!(items[1].bytes, Bytes::from_static(b"hello"));
    }
}
