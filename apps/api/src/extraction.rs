//! Document text extraction for uploaded resumes.
//!
//! Supports the two container formats the upload surface accepts (PDF and
//! DOCX) and reduces a document to a single plain-text string. Extraction
//! runs entirely in memory from the uploaded bytes; nothing is staged to
//! disk, so concurrent extractions cannot collide.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format '{0}': upload a PDF or DOCX file")]
    UnsupportedFormat(String),

    #[error("failed to extract text: {0}")]
    ExtractionFailed(String),
}

/// The two supported resume container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps an upload's declared content type onto a supported format.
    pub fn from_content_type(content_type: &str) -> Result<Self, ExtractError> {
        match content_type {
            PDF_CONTENT_TYPE => Ok(DocumentFormat::Pdf),
            DOCX_CONTENT_TYPE => Ok(DocumentFormat::Docx),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// An uploaded resume as received from the presentation layer: raw bytes
/// plus the declared media type. Consumed once by `extract_text` and not
/// retained afterwards.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Extracts the document's full text: PDF pages or DOCX paragraphs in
/// document order, joined by newlines. Malformed bytes yield an error and
/// no partial text.
pub fn extract_text(document: &ResumeDocument) -> Result<String, ExtractError> {
    match DocumentFormat::from_content_type(&document.content_type)? {
        DocumentFormat::Pdf => extract_pdf(&document.bytes),
        DocumentFormat::Docx => extract_docx(&document.bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::ExtractionFailed(format!("PDF parse error: {e}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ExtractError::ExtractionFailed(format!("DOCX parse error: {e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Concatenates the run text of one paragraph.
fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
