//! Resume Analysis Pipeline — orchestrates the full analysis of one upload.
//!
//! Flow: extract text → identify role + ATS feedback + summary (three
//! independent completions, issued concurrently) → NER keywords.
//!
//! Only text extraction is fatal. Every completion has a documented fallback
//! string, so a model failure degrades one field instead of the result.

pub mod handlers;

use serde::Serialize;
use tracing::{info, warn};

use crate::extraction::{extract_text, ResumeDocument};
use crate::keywords::KeywordExtractor;
use crate::tasks::{PromptTask, TaskRunner};

/// Substituted when role identification fails.
pub const FALLBACK_ROLE: &str = "General Professional";
/// Substituted when ATS feedback generation fails.
pub const FALLBACK_ATS: &str = "Unable to generate ATS feedback at this time.";
/// Substituted when summarization fails.
pub const FALLBACK_SUMMARY: &str = "Unable to generate resume summary at this time.";

/// The four-part analysis bundle handed to the presentation layer.
/// Fully populated when `success` is true; only `error` carries information
/// otherwise; the two shapes are never mixed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub resume_text: String,
    pub role: String,
    pub ats_feedback: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    fn failure(error: String) -> Self {
        Self {
            resume_text: String::new(),
            role: String::new(),
            ats_feedback: String::new(),
            summary: String::new(),
            keywords: Vec::new(),
            success: false,
            error: Some(error),
        }
    }
}

/// Runs the complete analysis pipeline on one uploaded document.
pub async fn analyze_resume(
    document: &ResumeDocument,
    tasks: &TaskRunner,
    keywords: Option<&KeywordExtractor>,
) -> AnalysisResult {
    let resume_text = match extract_text(document) {
        Ok(text) => text,
        Err(e) => {
            warn!("resume analysis aborted: {e}");
            return AnalysisResult::failure(e.to_string());
        }
    };

    // The three completions share nothing but the immutable text.
    let (role, ats_feedback, summary) = tokio::join!(
        identify_role(tasks, &resume_text),
        ats_feedback_for(tasks, &resume_text),
        summary_for(tasks, &resume_text),
    );

    let keywords = keywords
        .map(|extractor| extractor.extract(&resume_text))
        .unwrap_or_default();

    info!("resume analyzed: role={role}, {} keywords", keywords.len());

    AnalysisResult {
        resume_text,
        role,
        ats_feedback,
        summary,
        keywords,
        success: true,
        error: None,
    }
}

/// Identifies the most likely role; falls back to a generic title.
pub async fn identify_role(tasks: &TaskRunner, resume_text: &str) -> String {
    tasks
        .run(PromptTask::IdentifyRole, &[("resume", resume_text)])
        .await
        .unwrap_or_else(|e| {
            warn!("role identification failed: {e}");
            FALLBACK_ROLE.to_string()
        })
}

/// ATS compatibility feedback; falls back to a static message.
pub async fn ats_feedback_for(tasks: &TaskRunner, resume_text: &str) -> String {
    tasks
        .run(PromptTask::AtsFeedback, &[("resume", resume_text)])
        .await
        .unwrap_or_else(|e| {
            warn!("ATS feedback generation failed: {e}");
            FALLBACK_ATS.to_string()
        })
}

/// Professional summary; falls back to a static message.
pub async fn summary_for(tasks: &TaskRunner, resume_text: &str) -> String {
    tasks
        .run(PromptTask::SummarizeResume, &[("resume", resume_text)])
        .await
        .unwrap_or_else(|e| {
            warn!("resume summarization failed: {e}");
            FALLBACK_SUMMARY.to_string()
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use docx_rs::{Docx, Paragraph, Run};

    use super::*;
    use crate::extraction::{DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE};
    use crate::llm_client::stub::{FailingCompleter, RecordingCompleter, StubCompleter};

    fn resume_fixture() -> ResumeDocument {
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust, Tokio, Postgres")))
            .build()
            .pack(&mut buf)
            .unwrap();
        ResumeDocument {
            bytes: Bytes::from(buf.into_inner()),
            content_type: DOCX_CONTENT_TYPE.to_string(),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_the_whole_pipeline() {
        let document = ResumeDocument {
            bytes: Bytes::from_static(b"not a pdf"),
            content_type: PDF_CONTENT_TYPE.to_string(),
        };
        let tasks = TaskRunner::new(Arc::new(StubCompleter::replying("unused")));

        let result = analyze_resume(&document, &tasks, None).await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(result.resume_text.is_empty());
        assert!(result.role.is_empty());
        assert!(result.ats_feedback.is_empty());
        assert!(result.summary.is_empty());
        assert!(result.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_all_completions_failing_still_succeeds_with_fallbacks() {
        let tasks = TaskRunner::new(Arc::new(FailingCompleter));

        let result = analyze_resume(&resume_fixture(), &tasks, None).await;

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.role, FALLBACK_ROLE);
        assert_eq!(result.ats_feedback, FALLBACK_ATS);
        assert_eq!(result.summary, FALLBACK_SUMMARY);
        assert!(result.resume_text.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_successful_analysis_is_fully_populated() {
        let tasks = TaskRunner::new(Arc::new(StubCompleter::replying("Backend Engineer")));

        let result = analyze_resume(&resume_fixture(), &tasks, None).await;

        assert!(result.success);
        assert_eq!(result.role, "Backend Engineer");
        assert_eq!(result.ats_feedback, "Backend Engineer");
        assert_eq!(result.summary, "Backend Engineer");
        // Keyword extraction disabled: empty list, not a failure.
        assert!(result.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_each_completion_receives_the_extracted_text() {
        let completer = Arc::new(RecordingCompleter::replying("ok"));
        let tasks = TaskRunner::new(completer.clone());

        let result = analyze_resume(&resume_fixture(), &tasks, None).await;

        assert!(result.success);
        let prompts = completer.seen();
        assert_eq!(prompts.len(), 3);
        for prompt in &prompts {
            assert!(prompt.contains("Jane Doe"));
            assert!(prompt.contains("Rust, Tokio, Postgres"));
        }
    }

    #[test]
    fn test_failure_result_serializes_with_error_field() {
        let result = AnalysisResult::failure("boom".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
