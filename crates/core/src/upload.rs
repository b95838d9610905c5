//! Upload collaborator interface and image validation.
//!
//! The inventory core never handles file storage itself. It hands the raw
//! bytes to an [`UploadStore`] and persists only the returned public path.

use async_trait::async_trait;

use crate::error::CoreError;

/// Largest accepted upload (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Image extensions accepted for logos.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// Folder that manufacturer logos are stored under.
pub const MANUFACTURER_LOGO_FOLDER: &str = "ManufacturerLogos";

/// URL prefix that stored uploads are served from.
pub const PUBLIC_UPLOAD_PREFIX: &str = "/uploads";

/// A file received from a client, not yet validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Stores validated uploads and returns a retrievable public path.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store `file` under `folder` using `stem` as the base file name.
    ///
    /// Returns a path such as `/uploads/ManufacturerLogos/<name>`.
    async fn store(&self, folder: &str, stem: &str, file: UploadedFile)
        -> Result<String, CoreError>;

    /// Delete a file previously returned by [`store`](Self::store).
    ///
    /// Removing a file that is already gone succeeds.
    async fn remove(&self, public_path: &str) -> Result<(), CoreError>;
}

/// Validate that `file` is an image no larger than [`MAX_UPLOAD_BYTES`].
///
/// The extension, the declared MIME type (when present) and the file's magic
/// bytes must all agree that it is an allowed image. Returns the normalized
/// extension to store the file under.
pub fn validate_image_upload(file: &UploadedFile) -> Result<&'static str, CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".to_string()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {} bytes; the limit is {MAX_UPLOAD_BYTES} bytes",
            file.bytes.len()
        )));
    }

    let ext = file
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let Some(ext) = ALLOWED_IMAGE_EXTENSIONS.iter().find(|e| **e == ext) else {
        return Err(CoreError::Validation(
            "Only image files are allowed (jpeg, jpg, png, gif, webp)".to_string(),
        ));
    };

    if let Some(ct) = &file.content_type {
        if !ct.to_ascii_lowercase().starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "Only image files are allowed, got content type '{ct}'"
            )));
        }
    }

    match image::guess_format(&file.bytes) {
        Ok(
            image::ImageFormat::Png
            | image::ImageFormat::Jpeg
            | image::ImageFormat::Gif
            | image::ImageFormat::WebP,
        ) => Ok(*ext),
        _ => Err(CoreError::Validation(
            "File contents are not a supported image".to_string(),
        )),
    }
}

/// Public path for a stored file.
pub fn public_path(folder: &str, file_name: &str) -> String {
    format!("{PUBLIC_UPLOAD_PREFIX}/{folder}/{file_name}")
}

/// Split a public path back into its folder and file name.
///
/// Returns `None` for paths outside [`PUBLIC_UPLOAD_PREFIX`] or any segment
/// that could escape the upload root.
pub fn parse_public_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix(PUBLIC_UPLOAD_PREFIX)?.strip_prefix('/')?;
    let (folder, file_name) = rest.split_once('/')?;
    let safe = |segment: &str| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && !segment.contains(['/', '\\'])
    };
    (safe(folder) && safe(file_name)).then_some((folder, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn file(name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn accepts_png_with_matching_metadata() {
        let ext = validate_image_upload(&file("logo.PNG", Some("image/png"), PNG_HEADER));
        assert_eq!(ext.unwrap(), "png");
    }

    #[test]
    fn rejects_non_image_extension() {
        assert_matches!(
            validate_image_upload(&file("logo.exe", None, PNG_HEADER)),
            Err(CoreError::Validation(msg)) if msg.contains("Only image files")
        );
    }

    #[test]
    fn rejects_non_image_content_type() {
        assert_matches!(
            validate_image_upload(&file("logo.png", Some("application/pdf"), PNG_HEADER)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_disguised_non_image_bytes() {
        assert_matches!(
            validate_image_upload(&file("logo.png", Some("image/png"), b"#!/bin/sh\necho hi")),
            Err(CoreError::Validation(msg)) if msg.contains("not a supported image")
        );
    }

    #[test]
    fn rejects_oversized_files() {
        let mut big = PNG_HEADER.to_vec();
        big.resize(MAX_UPLOAD_BYTES + 1, 0);
        assert_matches!(
            validate_image_upload(&file("logo.png", None, &big)),
            Err(CoreError::Validation(msg)) if msg.contains("limit")
        );
    }

    #[test]
    fn rejects_empty_files() {
        assert_matches!(
            validate_image_upload(&file("logo.png", None, &[])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn public_path_uses_upload_prefix() {
        assert_eq!(
            public_path(MANUFACTURER_LOGO_FOLDER, "m-1.png"),
            "/uploads/ManufacturerLogos/m-1.png"
        );
    }

    #[test]
    fn public_paths_parse_back_to_folder_and_name() {
        let path = public_path(MANUFACTURER_LOGO_FOLDER, "m-1.png");
        assert_eq!(parse_public_path(&path), Some(("ManufacturerLogos", "m-1.png")));
    }

    #[test]
    fn foreign_or_escaping_paths_do_not_parse() {
        assert_eq!(parse_public_path("/static/logo.png"), None);
        assert_eq!(parse_public_path("/uploads/ManufacturerLogos"), None);
        assert_eq!(parse_public_path("/uploads/../secrets"), None);
        assert_eq!(parse_public_path("/uploads/ManufacturerLogos/../../etc/passwd"), None);
        assert_eq!(parse_public_path("/uploads/ManufacturerLogos/a\\b.png"), None);
    }
}
