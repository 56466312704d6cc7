//! File-reading collaborator for the CLI.
//!
//! The engine only ever sees decoded text. This reader handles plain text;
//! docx and pdf decoding live outside the engine, so those types come back
//! as the unreadable-source signal instead of half-parsed bytes.

use std::path::Path;

use ragcell_core::{ContentType, FileReader, ReadError};

/// Reads UTF-8 text files.
pub struct PlainTextReader;

impl PlainTextReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileReader for PlainTextReader {
    fn read(&self, path: &Path, content_type: ContentType) -> Result<String, ReadError> {
        match content_type {
            ContentType::Text => {
                let text = std::fs::read_to_string(path)?;
                if text.trim().is_empty() {
                    return Err(ReadError::Unreadable(path.display().to_string()));
                }
                Ok(text)
            }
            ContentType::Docx | ContentType::Pdf => {
                Err(ReadError::Unreadable(path.display().to_string()))
            }
        }
    }
}

/// Guess a content type from the file extension; unknown extensions are
/// treated as text.
pub fn content_type_for(path: &Path) -> ContentType {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("docx") => ContentType::Docx,
        Some("pdf") => ContentType::Pdf,
        _ => ContentType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "some document text").unwrap();

        let reader = PlainTextReader::new();
        let text = reader.read(file.path(), ContentType::Text).unwrap();
        assert!(text.contains("some document text"));
    }

    #[test]
    fn blank_file_is_unreadable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t").unwrap();

        let reader = PlainTextReader::new();
        let err = reader.read(file.path(), ContentType::Text).unwrap_err();
        assert!(matches!(err, ReadError::Unreadable(_)));
    }

    #[test]
    fn binary_formats_yield_the_unreadable_signal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let reader = PlainTextReader::new();

        let err = reader.read(file.path(), ContentType::Pdf).unwrap_err();
        assert!(matches!(err, ReadError::Unreadable(_)));
        assert!(err.to_string().starts_with("no readable text in"));
        let err = reader.read(file.path(), ContentType::Docx).unwrap_err();
        assert!(matches!(err, ReadError::Unreadable(_)));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("a.pdf")), ContentType::Pdf);
        assert_eq!(content_type_for(Path::new("a.DOCX")), ContentType::Docx);
        assert_eq!(content_type_for(Path::new("a.txt")), ContentType::Text);
        assert_eq!(content_type_for(Path::new("noext")), ContentType::Text);
    }
}
