//! Resume text extraction from uploaded PDF and DOCX files.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>` so handlers never touch the
//! parsing libraries directly.

mod docx;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;

pub const SUPPORTED_FILE_TYPES: &[&str] = &["pdf", "docx"];

const PARSE_FAILURE: &str = "Unable to parse the uploaded file. Please upload a valid PDF or DOCX.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub file_type: String,
    pub extracted_text: String,
    pub character_count: usize,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file_name: &str, bytes: Bytes) -> Result<ExtractedDocument, AppError>;
}

/// Default extractor: `pdf-extract` for PDF, `zip` + `quick-xml` for DOCX.
/// Parsing runs on the blocking pool; a panic inside a parser is reported as
/// an unparseable file.
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, file_name: &str, bytes: Bytes) -> Result<ExtractedDocument, AppError> {
        let file_name = file_name.to_string();
        tokio::task::spawn_blocking(move || extract_resume_text(&file_name, &bytes))
            .await
            .map_err(|e| {
                warn!("Document parser aborted: {e}");
                AppError::InvalidInput(PARSE_FAILURE.to_string())
            })?
    }
}

/// Lowercased extension of `file_name`, restricted to the supported types.
/// Runs before the upload body is read.
pub fn file_type_of(file_name: &str) -> Result<String, AppError> {
    if file_name.trim().is_empty() {
        return Err(AppError::InvalidInput("File name is required".to_string()));
    }
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FILE_TYPES.contains(&extension.as_str()) {
        return Err(AppError::InvalidInput(
            "Only PDF and DOCX files are supported".to_string(),
        ));
    }
    Ok(extension)
}

pub fn extract_resume_text(file_name: &str, bytes: &[u8]) -> Result<ExtractedDocument, AppError> {
    let file_type = file_type_of(file_name)?;
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    let raw = match file_type.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| anyhow::anyhow!("PDF extraction failed: {e}")),
        _ => docx::extract_text(bytes),
    }
    .map_err(|e| {
        warn!(file_type = %file_type, "Failed to parse upload: {e:#}");
        AppError::InvalidInput(PARSE_FAILURE.to_string())
    })?;

    let extracted_text = normalize_whitespace(&raw);
    if extracted_text.is_empty() {
        return Err(AppError::InvalidInput(
            "Could not extract readable text from the uploaded file".to_string(),
        ));
    }

    Ok(ExtractedDocument {
        file_name: file_name.to_string(),
        file_type,
        character_count: extracted_text.chars().count(),
        extracted_text,
    })
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
