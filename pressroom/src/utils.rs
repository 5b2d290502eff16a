use std::path::Path;

use crate::errors::Error;

use post_model::LocalFile;

/// Read a media file from disk, guessing its MIME type from the path.
///
/// An unguessable type falls back to a generic binary type rather than
/// failing; the server decides what it accepts.
pub async fn read_media_file(path: &Path) -> Result<LocalFile, Error> {
    let bytes = tokio::fs::read(path).await?;

    let mime_type = match mime_guess::MimeGuess::from_path(path).first_raw() {
        Some(mime) => mime,
        None => "application/octet-stream",
    };

    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::new(),
    };

    Ok(LocalFile::new(file_name, mime_type, bytes))
}
