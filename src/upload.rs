// Upload adapter: turns a user-chosen file into an ImageBuffer without blocking
// the runtime.

use tracing::debug;

use crate::error::UploadError;
use crate::image::ImageBuffer;

/// A file as handed over by the browser (or read from disk).
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Decodes an optional upload into an [`ImageBuffer`].
///
/// `None` means the picker was dismissed and is reported as [`UploadError::NoFile`].
/// The declared content type wins when it names an image; otherwise the bytes are
/// sniffed. Sniffing runs on the blocking pool.
pub async fn accept(file: Option<UploadedFile>) -> Result<ImageBuffer, UploadError> {
    let file = file.ok_or(UploadError::NoFile)?;
    if file.bytes.is_empty() {
        return Err(UploadError::NoFile);
    }

    let image = tokio::task::spawn_blocking(move || decode(file))
        .await
        .map_err(|e| UploadError::Worker(e.to_string()))??;

    debug!(mime = image.mime_type(), bytes = image.len(), "upload decoded");
    Ok(image)
}

fn decode(file: UploadedFile) -> Result<ImageBuffer, UploadError> {
    let declared = file
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .map(|ct| ct.split(';').next().unwrap_or(&ct).trim().to_string());

    let mime_type = match declared {
        Some(mime) => mime,
        None => sniff(&file.bytes, file.file_name.as_deref()).ok_or(UploadError::NotAnImage)?,
    };

    Ok(ImageBuffer::new(file.bytes, mime_type))
}

fn sniff(bytes: &[u8], file_name: Option<&str>) -> Option<String> {
    let format = ::image::guess_format(bytes).ok().or_else(|| {
        let name = file_name?;
        ::image::ImageFormat::from_path(name).ok()
    })?;
    Some(format.to_mime_type().to_string())
}
