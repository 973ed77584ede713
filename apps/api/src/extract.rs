//! Document extractor — converts an uploaded resume into plain text.
//!
//! Supported: PDF (via `pdf-extract`) and UTF-8 plain text. Other formats are
//! rejected with a validation error rather than silently mangled.

use tracing::{debug, info};

use crate::errors::AppError;

/// Extracts plain text from an uploaded resume file.
pub fn extract_text(
    filename: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    debug!(
        "Extracting text from '{}' ({} bytes, content type {:?})",
        filename,
        data.len(),
        content_type
    );

    let text = if is_pdf(filename, content_type) {
        pdf_extract::extract_text_from_mem(data).map_err(|e| {
            AppError::Validation(format!("Failed to extract text from PDF '{filename}': {e}"))
        })?
    } else if is_plain_text(filename, content_type) {
        std::str::from_utf8(data)
            .map_err(|_| {
                AppError::Validation(format!("File '{filename}' is not valid UTF-8 text"))
            })?
            .to_string()
    } else {
        return Err(AppError::Validation(format!(
            "Unsupported file type for '{filename}'; upload a PDF or plain-text resume"
        )));
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(format!(
            "No text could be extracted from '{filename}'"
        )));
    }

    info!(
        "Extracted {} characters of resume text from '{}'",
        text.len(),
        filename
    );
    Ok(text)
}

fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf") || filename.to_lowercase().ends_with(".pdf")
}

fn is_plain_text(filename: &str, content_type: Option<&str>) -> bool {
    matches!(content_type, Some(ct) if ct.starts_with("text/"))
        || filename.to_lowercase().ends_with(".txt")
        || filename.to_lowercase().ends_with(".md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let data = b"Jane Doe\nRust engineer, 5 years.";
        let text = extract_text("resume.txt", Some("text/plain"), data).unwrap();
        assert_eq!(text, "Jane Doe\nRust engineer, 5 years.");
    }

    #[test]
    fn test_plain_text_trimmed() {
        let text = extract_text("resume.txt", None, b"  padded  \n").unwrap();
        assert_eq!(text, "padded");
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = extract_text("resume.txt", Some("text/plain"), b"").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let err = extract_text("resume.docx", Some("application/msword"), b"abc").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = extract_text("resume.txt", Some("text/plain"), &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_content_type_beats_extension_for_pdf() {
        assert!(is_pdf("upload.bin", Some("application/pdf")));
        assert!(is_pdf("resume.PDF", None));
        assert!(!is_pdf("resume.txt", Some("text/plain")));
    }
}
