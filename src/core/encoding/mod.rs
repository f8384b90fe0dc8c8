//! Attachment encoding
//!
//! Turns attached files into [`EncodedFile`]s. All files of a submission are
//! read and encoded concurrently and the batch resolves only when every file
//! is done; the first failure aborts the whole batch with no partial result.

use crate::domain::{AttachedFile, EncodedFile, EncodingError};
use futures::future::try_join_all;
use mime::Mime;
use std::path::Path;

/// Media type for a file name, detected from its extension
pub fn detect_media_type(file_name: &str) -> Option<Mime> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    let detected = match extension.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "pdf" => mime::APPLICATION_PDF,
        "txt" => mime::TEXT_PLAIN,
        "csv" => mime::TEXT_CSV,
        "json" => mime::APPLICATION_JSON,
        "webp" => "image/webp".parse().ok()?,
        "heic" => "image/heic".parse().ok()?,
        _ => return None,
    };
    Some(detected)
}

/// Resolves the media type of an attachment
///
/// A declared type wins when it parses; otherwise the extension decides.
pub fn resolve_media_type(file: &AttachedFile) -> Result<Mime, EncodingError> {
    let declared = file
        .declared_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse::<Mime>().ok());

    declared
        .or_else(|| detect_media_type(&file.name))
        .ok_or_else(|| EncodingError::missing_media_type(&file.name))
}

/// Encodes a single attachment
pub async fn encode_file(file: &AttachedFile, name_limit: usize) -> Result<EncodedFile, EncodingError> {
    let media_type = resolve_media_type(file)?;
    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| EncodingError::unreadable(&file.name, e.to_string()))?;

    tracing::trace!(
        file_name = %file.name,
        media_type = %media_type,
        size = bytes.len(),
        "Encoded attachment"
    );

    Ok(EncodedFile::from_bytes(
        &file.name,
        media_type.essence_str(),
        &bytes,
        name_limit,
    ))
}

/// Encodes all attachments concurrently, preserving their order
///
/// # Errors
///
/// Returns the first [`EncodingError`]; no partial result is produced.
pub async fn encode_files(
    files: &[AttachedFile],
    name_limit: usize,
) -> Result<Vec<EncodedFile>, EncodingError> {
    let encoded = try_join_all(files.iter().map(|file| encode_file(file, name_limit))).await?;

    tracing::debug!(
        count = encoded.len(),
        total_bytes = encoded.iter().map(|f| f.size).sum::<u64>(),
        "Attachments encoded"
    );

    Ok(encoded)
}
