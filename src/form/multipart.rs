// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! multipart/form-data encoding

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use bytes::Bytes;
use rand::Rng;

use super::field::{FieldDescriptor, FormData};
use crate::error::{ErrorContext, Result};

const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

/// Streams form fields into `W` as multipart parts
pub struct MultipartWriter<W: Write> {
    writer: W,
    boundary: String,
    parts: usize,
}

impl<W: Write> MultipartWriter<W> {
    /// Writer with a random boundary
    pub fn new(writer: W) -> Self {
        Self::with_boundary(writer, random_boundary())
    }

    /// Writer with a fixed boundary
    pub fn with_boundary(writer: W, boundary: impl Into<String>) -> Self {
        Self {
            writer,
            boundary: boundary.into(),
            parts: 0,
        }
    }

    /// Boundary separating the parts
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's Content-Type header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Write one field as its own part
    ///
    /// File fields are opened before anything is written and copied verbatim.
    pub fn write_field(&mut self, name: &str, field: &FieldDescriptor) -> Result<()> {
        if field.is_file {
            let path = Path::new(&field.value);
            let mut file = File::open(path).with_path(path)?;

            let content_type = if field.content_type.is_empty() {
                DEFAULT_FILE_TYPE
            } else {
                field.content_type.as_str()
            };
            self.begin_part(&[
                (
                    "Content-Disposition",
                    format!(
                        "form-data; name=\"{}\"; filename=\"{}\"",
                        escape_quotes(name),
                        escape_quotes(&field.file_alias)
                    ),
                ),
                ("Content-Type", content_type.to_string()),
            ])?;
            io::copy(&mut file, &mut self.writer).with_path(path)?;
        } else {
            let mut headers = vec![(
                "Content-Disposition",
                format!("form-data; name=\"{}\"", escape_quotes(name)),
            )];
            if !field.content_type.is_empty() {
                headers.push(("Content-Type", field.content_type.clone()));
            }
            self.begin_part(&headers)?;
            self.writer.write_all(field.value.as_bytes())?;
        }
        Ok(())
    }

    /// Write the closing boundary and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        if self.parts > 0 {
            write!(self.writer, "\r\n")?;
        }
        write!(self.writer, "--{}--\r\n", self.boundary)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn begin_part(&mut self, headers: &[(&str, String)]) -> Result<()> {
        if self.parts > 0 {
            write!(self.writer, "\r\n")?;
        }
        write!(self.writer, "--{}\r\n", self.boundary)?;
        for (name, value) in headers {
            write!(self.writer, "{}: {}\r\n", name, value)?;
        }
        write!(self.writer, "\r\n")?;
        self.parts += 1;
        Ok(())
    }
}

/// Encode a whole form into memory, returning the body and its Content-Type
///
/// The first field that fails aborts the body.
pub fn build_multipart(form: &FormData) -> Result<(Bytes, String)> {
    let mut writer = MultipartWriter::new(Vec::new());
    for (name, field) in form {
        writer.write_field(name, field)?;
    }
    let content_type = writer.content_type();
    let body = writer.finish()?;
    Ok((Bytes::from(body), content_type))
}

fn random_boundary() -> String {
    let bytes: [u8; 30] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::parse_field;
    use std::io::Write as _;

    #[test]
    fn test_plain_and_file_parts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0x89, b'P', b'N', b'G', 0, 1])
            .unwrap();

        let (_, file_field) =
            parse_field(&format!("avatar=@{};type=image/png", path.display())).unwrap();
        let (_, text_field) = parse_field("note=hi there").unwrap();

        let mut writer = MultipartWriter::with_boundary(Vec::new(), "XYZ");
        writer.write_field("note", &text_field).unwrap();
        writer.write_field("avatar", &file_field).unwrap();
        let body = writer.finish().unwrap();

        let mut expected = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"note\"\r\n\r\n\
hi there\r\n\
--XYZ\r\n\
Content-Disposition: form-data; name=\"avatar\"; filename=\"photo.png\"\r\n\
Content-Type: image/png\r\n\r\n"
            .to_vec();
        expected.extend_from_slice(&[0x89, b'P', b'N', b'G', 0, 1]);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_file_defaults_to_octet_stream() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"data").unwrap();
        let (_, field) = parse_field(&format!("f=@{}", tmp.path().display())).unwrap();

        let mut writer = MultipartWriter::with_boundary(Vec::new(), "B");
        writer.write_field("f", &field).unwrap();
        let body = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(body.contains("Content-Type: application/octet-stream\r\n"));
    }

    #[test]
    fn test_missing_file_aborts_body() {
        let mut form = FormData::new();
        form.insert("a".to_string(), parse_field("a=1").unwrap().1);
        form.insert("b".to_string(), parse_field("b=@/no/such/file").unwrap().1);

        let err = build_multipart(&form).unwrap_err();
        assert_eq!(err.path(), Some(Path::new("/no/such/file")));
    }

    #[test]
    fn test_build_multipart_content_type() {
        let mut form = FormData::new();
        form.insert("a".to_string(), parse_field("a=1").unwrap().1);

        let (body, content_type) = build_multipart(&form).unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        assert_eq!(boundary.len(), 60);
        assert!(String::from_utf8_lossy(&body).ends_with(&format!("--{}--\r\n", boundary)));
    }
}
