//! Inline PDF storage. Resumes and LinkedIn exports arrive as base64 JSON
//! and are kept as raw binary inside the student document.

use data_encoding::BASE64;
use mongodb::bson::{spec::BinarySubtype, Binary, DateTime};

use crate::models::DocumentBlob;
use crate::utils::ApiError;

pub const MAX_PDF_BYTES: usize = 2 * 1024 * 1024; // 2MB

fn is_pdf(file_name: &str, mime_type: &str) -> bool {
    mime_type == "application/pdf" || file_name.to_lowercase().ends_with(".pdf")
}

/// Decode and validate an uploaded PDF payload into a storable blob.
pub fn ingest_pdf(file_name: &str, mime_type: &str, data: &str) -> Result<DocumentBlob, ApiError> {
    if !is_pdf(file_name, mime_type) {
        return Err(ApiError::bad_request("Only PDF files are allowed"));
    }

    let bytes = BASE64
        .decode(data.as_bytes())
        .map_err(|_| ApiError::bad_request("Invalid base64 data"))?;

    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    if bytes.len() > MAX_PDF_BYTES {
        return Err(ApiError::bad_request("File size should not exceed 2MB"));
    }

    let file_size = bytes.len() as i64;

    Ok(DocumentBlob {
        data: Binary {
            subtype: BinarySubtype::Generic,
            bytes,
        },
        content_type: "application/pdf".to_string(),
        file_name: file_name.to_string(),
        file_size,
        uploaded_at: DateTime::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_small_pdf() {
        let encoded = BASE64.encode(b"%PDF-1.4 hello");
        let blob = ingest_pdf("resume.pdf", "application/pdf", &encoded).unwrap();
        assert_eq!(blob.file_name, "resume.pdf");
        assert_eq!(blob.file_size, 14);
        assert_eq!(blob.content_type, "application/pdf");
    }

    #[test]
    fn rejects_non_pdf_uploads() {
        let encoded = BASE64.encode(b"GIF89a");
        let err = ingest_pdf("resume.gif", "image/gif", &encoded).unwrap_err();
        assert_eq!(err.message, "Only PDF files are allowed");
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = ingest_pdf("resume.pdf", "application/pdf", "not//valid==base64!").unwrap_err();
        assert_eq!(err.message, "Invalid base64 data");
    }

    #[test]
    fn rejects_oversized_files() {
        let encoded = BASE64.encode(&vec![0u8; MAX_PDF_BYTES + 1]);
        let err = ingest_pdf("resume.pdf", "application/pdf", &encoded).unwrap_err();
        assert_eq!(err.message, "File size should not exceed 2MB");
    }

    #[test]
    fn rejects_empty_payloads() {
        let err = ingest_pdf("resume.pdf", "application/pdf", "").unwrap_err();
        assert_eq!(err.message, "Uploaded file is empty");
    }
}
