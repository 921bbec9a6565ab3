#[cfg(test)]
mod tests {
    use std::{
        fs::File,
        io::{self, Read, Seek, SeekFrom, Write},
        path::PathBuf,
    };

    use nyquest_multipart::{FileField, Form, Monitor, MultipartEncoder, Progress, SizedReader};

    use crate::*;

    const TEST_CONTENT: &str = "test content";

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(tag: &str, content: &[u8]) -> Self {
            let path = std::env::temp_dir().join(format!(
                "nyquest-multipart-{tag}-{}.txt",
                std::process::id()
            ));
            File::create(&path).unwrap().write_all(content).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    #[test]
    fn test_file_source() {
        let temp = TempFile::new("file-source", TEST_CONTENT.as_bytes());
        let form = Form::new().file(
            "file",
            FileField::new(File::open(&temp.0).unwrap())
                .with_filename("test.txt")
                .with_content_type("text/plain"),
        );
        let mut encoder = MultipartEncoder::new(form).unwrap();
        let content_type = encoder.content_type().to_owned();
        let body = encoder.to_bytes().unwrap();
        assert_eq!(body.len() as u64, encoder.len());

        let items = parse_body(&content_type, body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "file");
        assert_eq!(items[0].file_name.as_deref(), Some("test.txt"));
        assert_eq!(items[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(items[0].bytes, TEST_CONTENT.as_bytes());
    }

    #[test]
    fn test_partially_consumed_file_sends_the_rest() {
        let temp = TempFile::new("file-offset", TEST_CONTENT.as_bytes());
        let mut file = File::open(&temp.0).unwrap();
        file.seek(SeekFrom::Start(5)).unwrap();
        let mut encoder =
            MultipartEncoder::new(Form::new().file("file", FileField::new(file))).unwrap();
        let content_type = encoder.content_type().to_owned();
        let items = parse_body(&content_type, encoder.to_bytes().unwrap());
        assert_eq!(items[0].bytes, &TEST_CONTENT.as_bytes()[5..]);
    }

    #[test]
    fn test_large_stream_with_progress() {
        const SIZE: u64 = 1 << 20;
        const CHUNK: usize = 8192;
        let form = Form::new().text("kind", "zeros").file(
            "zeros",
            FileField::new(SizedReader::new(io::repeat(0), SIZE)).with_filename("zeros.bin"),
        );
        let mut reports = 0;
        let mut last = None;
        let mut monitor = Monitor::from_form(form, |p: &Progress| {
            reports += 1;
            last = Some(*p);
        })
        .unwrap();
        let content_type = monitor.content_type().to_owned();
        let len = monitor.len();
        assert!(len > SIZE);

        let mut chunks = vec![];
        let mut buf = vec![0; CHUNK];
        loop {
            let n = monitor.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            assert!(n <= CHUNK);
            chunks.push(buf[..n].to_vec());
        }
        assert!(monitor.finished());
        drop(monitor);

        assert_eq!(reports, chunks.len() + 1);
        assert_eq!(
            last,
            Some(Progress {
                bytes_read: len,
                len
            })
        );

        let items = parse_chunks(&content_type, chunks);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].bytes.len() as u64, SIZE);
        assert!(items[1].bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_borrowed_file_is_usable_afterwards() {
        let temp = TempFile::new("file-borrowed", TEST_CONTENT.as_bytes());
        let mut file = File::open(&temp.0).unwrap();
        let (content_type, body) = {
            let form = Form::new().file(
                "file",
                FileField::new(&mut file).with_filename("borrowed.txt"),
            );
            let mut encoder = MultipartEncoder::new(form).unwrap();
            let content_type = encoder.content_type().to_owned();
            (content_type, encoder.to_bytes().unwrap())
        };
        let items = parse_body(&content_type, body);
        assert_eq!(items[0].bytes, TEST_CONTENT.as_bytes());

        assert_eq!(
            file.stream_position().unwrap(),
            TEST_CONTENT.len() as u64
        );
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut again = String::new();
        file.read_to_string(&mut again).unwrap();
        assert_eq!(again, TEST_CONTENT);
    }
}
