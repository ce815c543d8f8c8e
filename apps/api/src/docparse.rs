//! Resume document text extraction.

use crate::errors::AppError;

/// Extracts plain text from an uploaded resume document.
///
/// PDF extraction runs on a blocking thread; plain text passes through.
/// Any other MIME type is rejected up front.
pub async fn extract_text(mime_type: &str, bytes: Vec<u8>) -> Result<String, AppError> {
    match mime_type {
        "application/pdf" => {
            let text = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes)
            })
            .await
            .map_err(|e| anyhow::anyhow!("pdf extraction task panicked: {e}"))?
            .map_err(|e| AppError::Validation(format!("Failed to extract text from PDF: {e}")))?;
            Ok(normalize(&text))
        }
        "text/plain" => {
            let text = String::from_utf8(bytes)
                .map_err(|_| AppError::Validation("Resume file is not valid UTF-8".to_string()))?;
            Ok(normalize(&text))
        }
        other => Err(AppError::Validation(format!(
            "Unsupported file type: {other}. Upload a PDF or plain-text resume."
        ))),
    }
}

/// Collapses extraction artifacts: runs of blank lines and trailing spaces.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let text = extract_text("text/plain", b"Skills: Rust, SQL".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Skills: Rust, SQL");
    }

    #[tokio::test]
    async fn test_unsupported_mime_rejected() {
        let err = extract_text("application/msword", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_rejected() {
        let err = extract_text("text/plain", vec![0xff, 0xfe, 0x00])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_normalize_collapses_blank_runs() {
        let out = normalize("a\n\n\n\nb  \nc\n");
        assert_eq!(out, "a\n\nb\nc");
    }
}
