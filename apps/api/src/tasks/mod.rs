//! Prompted Task Executor — renders one of the five fixed prompt templates
//! and obtains a completion through the `Completer` seam.
//!
//! Every derived artifact in the engine (role, ATS feedback, summary,
//! interview question, answer evaluation) is produced here and nowhere else.

use std::sync::Arc;

use thiserror::Error;

use crate::llm_client::{Completer, LlmError};

pub mod prompts;

/// One of the engine's fixed prompt templates. A closed set: adding a task
/// means declaring its placeholders here, so template/argument mismatches
/// cannot drift in at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTask {
    IdentifyRole,
    InterviewQuestion,
    EvaluateAnswer,
    AtsFeedback,
    SummarizeResume,
}

impl PromptTask {
    /// The fixed template text for this task.
    pub const fn template(self) -> &'static str {
        match self {
            PromptTask::IdentifyRole => prompts::IDENTIFY_ROLE_TEMPLATE,
            PromptTask::InterviewQuestion => prompts::INTERVIEW_QUESTION_TEMPLATE,
            PromptTask::EvaluateAnswer => prompts::EVALUATE_ANSWER_TEMPLATE,
            PromptTask::AtsFeedback => prompts::ATS_FEEDBACK_TEMPLATE,
            PromptTask::SummarizeResume => prompts::SUMMARIZE_RESUME_TEMPLATE,
        }
    }

    /// The exact placeholder names this task's template declares.
    pub const fn placeholders(self) -> &'static [&'static str] {
        match self {
            PromptTask::IdentifyRole => &["resume"],
            PromptTask::InterviewQuestion => &["role"],
            PromptTask::EvaluateAnswer => &["role", "question", "answer"],
            PromptTask::AtsFeedback => &["resume"],
            PromptTask::SummarizeResume => &["resume"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PromptTask::IdentifyRole => "identify_role",
            PromptTask::InterviewQuestion => "interview_question",
            PromptTask::EvaluateAnswer => "evaluate_answer",
            PromptTask::AtsFeedback => "ats_feedback",
            PromptTask::SummarizeResume => "summarize_resume",
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task {task} is missing variable '{{{name}}}'")]
    MissingVariable {
        task: &'static str,
        name: &'static str,
    },

    #[error("task {task} does not declare variable '{{{name}}}'")]
    UnknownVariable { task: &'static str, name: String },

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
}

/// Runs prompt tasks against a completion backend.
#[derive(Clone)]
pub struct TaskRunner {
    completer: Arc<dyn Completer>,
}

impl TaskRunner {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self { completer }
    }

    /// Renders `task` with `vars` and returns the trimmed completion text
    /// verbatim. Callers expecting a particular output shape (e.g. a score
    /// line) treat it as best effort; nothing is validated here.
    pub async fn run(&self, task: PromptTask, vars: &[(&str, &str)]) -> Result<String, TaskError> {
        let prompt = render(task, vars)?;
        let completion = self.completer.complete(&prompt).await?;
        Ok(completion.trim().to_string())
    }
}

/// Substitutes `vars` into the task's template. The variable set must match
/// the declared placeholders exactly: a mismatch is a caller bug, not a
/// runtime condition to recover from.
fn render(task: PromptTask, vars: &[(&str, &str)]) -> Result<String, TaskError> {
    let declared = task.placeholders();

    if let Some((name, _)) = vars.iter().find(|(name, _)| !declared.contains(name)) {
        return Err(TaskError::UnknownVariable {
            task: task.name(),
            name: (*name).to_string(),
        });
    }

    let mut prompt = task.template().to_string();
    for &name in declared {
        let (_, value) = vars
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or(TaskError::MissingVariable {
                task: task.name(),
                name,
            })?;
        prompt = prompt.replace(&format!("{{{name}}}"), value);
    }
    Ok(prompt)
}
