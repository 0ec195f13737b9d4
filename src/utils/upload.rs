use std::path::Path as StdPath;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::{Error, Result};

pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Reads the first non-empty file in `field_name`.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field.bytes().await?;
        if data.len() > max_bytes {
            return Err(Error::BadRequest(format!(
                "File exceeds the {} byte upload limit",
                max_bytes
            )));
        }
        if !data.is_empty() {
            return Ok(UploadedFile { filename, data });
        }
    }
    Err(Error::BadRequest(format!(
        "No file provided in field '{}'",
        field_name
    )))
}

fn extension(filename: &str) -> String {
    StdPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Checks extension and magic bytes; returns the content type to forward.
pub fn check_banner_image(filename: &str, data: &[u8]) -> Result<&'static str> {
    let ext = extension(filename);
    let (content_type, magic_ok) = match ext.as_str() {
        "jpg" | "jpeg" => ("image/jpeg", data.starts_with(&[0xFF, 0xD8])),
        "png" => ("image/png", data.starts_with(&[0x89, 0x50, 0x4E, 0x47])),
        "webp" => (
            "image/webp",
            data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        ),
        _ => {
            return Err(Error::BadRequest(format!(
                "File type .{} is not allowed for banners",
                ext
            )))
        }
    };
    if !magic_ok {
        return Err(Error::BadRequest(format!("Invalid {} file content", content_type)));
    }
    Ok(content_type)
}

/// Import documents must be `.json` and valid UTF-8.
pub fn read_import_document(file: &UploadedFile) -> Result<String> {
    if extension(&file.filename) != "json" {
        return Err(Error::InvalidImport(
            "Only .json files can be imported".to_string(),
        ));
    }
    String::from_utf8(file.data.to_vec())
        .map_err(|_| Error::InvalidImport("Import file is not valid UTF-8".to_string()))
}
