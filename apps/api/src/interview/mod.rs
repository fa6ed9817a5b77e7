//! Interview Session State Machine.
//!
//! A session moves NOT_STARTED → ACTIVE → ENDED; ENDED is terminal for the
//! instance and a fresh session replaces it in the engine slot. Turns are
//! append-only: a turn is created with its question, and answer + evaluation
//! are filled together when the candidate responds, never one without the
//! other.

pub mod handlers;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::tasks::{PromptTask, TaskRunner};

/// Substituted when question generation fails; `{role}` is filled in.
const FALLBACK_QUESTION: &str = "Tell me about your experience in {role}?";
/// Substituted when answer evaluation fails.
const FALLBACK_EVALUATION: &str =
    "Score: 5/10\nEvaluation: Unable to evaluate answer at this time.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("interview role must not be empty")]
    EmptyRole,

    #[error("the interview session has ended")]
    NotActive,

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("no unanswered question is pending")]
    NoPendingQuestion,
}

/// One question/answer/evaluation unit within a session.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewTurn {
    pub question: String,
    pub answer: Option<String>,
    pub evaluation: Option<String>,
}

impl InterviewTurn {
    fn new(question: String) -> Self {
        Self {
            question,
            answer: None,
            evaluation: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// A single candidate's mock-interview session for one role.
#[derive(Debug)]
pub struct InterviewSession {
    role: String,
    turns: Vec<InterviewTurn>,
    active: bool,
}

impl InterviewSession {
    /// Starts a fresh ACTIVE session for `role` with no turns.
    pub fn start(role: &str) -> Result<Self, SessionError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(SessionError::EmptyRole);
        }
        Ok(Self {
            role: role.to_string(),
            turns: Vec::new(),
            active: true,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn turns(&self) -> &[InterviewTurn] {
        &self.turns
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // ────────────────────────────────────────────────────────────────────
    // Operations
    // ────────────────────────────────────────────────────────────────────

    /// Generates the next question and appends it as a new turn.
    ///
    /// A generation failure substitutes the fallback question, so an active
    /// session always gains exactly one turn per call. Requesting again
    /// before answering is allowed; the earlier turn then stays permanently
    /// unanswered.
    pub async fn request_question(
        &mut self,
        tasks: &TaskRunner,
    ) -> Result<&InterviewTurn, SessionError> {
        if !self.active {
            return Err(SessionError::NotActive);
        }

        let question = match tasks
            .run(PromptTask::InterviewQuestion, &[("role", &self.role)])
            .await
        {
            Ok(question) => question,
            Err(e) => {
                warn!("question generation failed, using fallback: {e}");
                FALLBACK_QUESTION.replace("{role}", &self.role)
            }
        };

        self.turns.push(InterviewTurn::new(question));
        Ok(self.turns.last().expect("turn was just appended"))
    }

    /// Records the candidate's answer on the current turn together with its
    /// evaluation. Both fields are assigned in one step; a failed evaluation
    /// call substitutes the fallback text instead of surfacing.
    ///
    /// Blank answers are rejected before any state changes so the caller can
    /// ask the candidate to retry.
    pub async fn submit_answer(
        &mut self,
        tasks: &TaskRunner,
        answer: &str,
    ) -> Result<&InterviewTurn, SessionError> {
        if !self.active {
            return Err(SessionError::NotActive);
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        let question = match self.turns.last() {
            Some(turn) if !turn.is_answered() => turn.question.clone(),
            _ => return Err(SessionError::NoPendingQuestion),
        };

        let evaluation = match tasks
            .run(
                PromptTask::EvaluateAnswer,
                &[
                    ("role", &self.role),
                    ("question", &question),
                    ("answer", answer),
                ],
            )
            .await
        {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("answer evaluation failed, using fallback: {e}");
                FALLBACK_EVALUATION.to_string()
            }
        };

        let turn = self.turns.last_mut().expect("pending turn checked above");
        turn.answer = Some(answer.to_string());
        turn.evaluation = Some(evaluation);
        Ok(self.turns.last().expect("pending turn checked above"))
    }

    /// Ends the session. Idempotent; turns are preserved for review.
    pub fn end(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::stub::{FailingCompleter, RecordingCompleter, StubCompleter};

    fn runner_replying(text: &str) -> TaskRunner {
        TaskRunner::new(Arc::new(StubCompleter::replying(text)))
    }

    fn failing_runner() -> TaskRunner {
        TaskRunner::new(Arc::new(FailingCompleter))
    }

    #[test]
    fn test_start_requires_a_role() {
        assert_eq!(InterviewSession::start("").unwrap_err(), SessionError::EmptyRole);
        assert_eq!(
            InterviewSession::start("   ").unwrap_err(),
            SessionError::EmptyRole
        );
    }

    #[test]
    fn test_start_yields_an_active_empty_session() {
        let session = InterviewSession::start("Backend Engineer").unwrap();
        assert!(session.is_active());
        assert_eq!(session.role(), "Backend Engineer");
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_request_question_appends_one_unanswered_turn() {
        let tasks = runner_replying("How do you shard a Postgres table?");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();

        session.request_question(&tasks).await.unwrap();

        assert_eq!(session.turns().len(), 1);
        let turn = &session.turns()[0];
        assert_eq!(turn.question, "How do you shard a Postgres table?");
        assert!(turn.answer.is_none());
        assert!(turn.evaluation.is_none());
    }

    #[tokio::test]
    async fn test_question_generation_failure_appends_the_fallback_question() {
        let tasks = failing_runner();
        let mut session = InterviewSession::start("Backend Engineer").unwrap();

        session.request_question(&tasks).await.unwrap();

        assert_eq!(session.turns().len(), 1);
        assert_eq!(
            session.turns()[0].question,
            "Tell me about your experience in Backend Engineer?"
        );
    }

    #[tokio::test]
    async fn test_two_questions_without_an_answer_leave_the_first_unanswered() {
        let tasks = runner_replying("A question");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();

        session.request_question(&tasks).await.unwrap();
        session.request_question(&tasks).await.unwrap();

        assert_eq!(session.turns().len(), 2);
        assert!(!session.turns()[0].is_answered());
        assert!(!session.turns()[1].is_answered());

        session.submit_answer(&tasks, "An answer").await.unwrap();
        assert!(!session.turns()[0].is_answered(), "first turn stays unanswered");
        assert!(session.turns()[1].is_answered());
    }

    #[tokio::test]
    async fn test_blank_answer_is_rejected_without_mutating_the_turn() {
        let tasks = runner_replying("A question");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();
        session.request_question(&tasks).await.unwrap();

        for blank in ["", "   ", "\n\t"] {
            let err = session.submit_answer(&tasks, blank).await.unwrap_err();
            assert_eq!(err, SessionError::EmptyAnswer);
        }

        let turn = &session.turns()[0];
        assert!(turn.answer.is_none());
        assert!(turn.evaluation.is_none());
    }

    #[tokio::test]
    async fn test_submit_answer_sets_answer_and_evaluation_together() {
        let tasks = runner_replying("Score: 8/10\nEvaluation: solid");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();
        session.request_question(&tasks).await.unwrap();

        session.submit_answer(&tasks, "I used caching.").await.unwrap();

        let turn = &session.turns()[0];
        assert_eq!(turn.answer.as_deref(), Some("I used caching."));
        assert_eq!(turn.evaluation.as_deref(), Some("Score: 8/10\nEvaluation: solid"));
    }

    #[tokio::test]
    async fn test_evaluation_failure_substitutes_the_fallback_text() {
        let tasks = failing_runner();
        let mut session = InterviewSession::start("Backend Engineer").unwrap();
        session.request_question(&tasks).await.unwrap();

        session.submit_answer(&tasks, "I used caching.").await.unwrap();

        let turn = &session.turns()[0];
        assert_eq!(turn.answer.as_deref(), Some("I used caching."));
        assert_eq!(turn.evaluation.as_deref(), Some(FALLBACK_EVALUATION));
    }

    #[tokio::test]
    async fn test_submit_answer_without_a_pending_question_is_rejected() {
        let tasks = runner_replying("whatever");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();

        let err = session.submit_answer(&tasks, "answer").await.unwrap_err();
        assert_eq!(err, SessionError::NoPendingQuestion);

        session.request_question(&tasks).await.unwrap();
        session.submit_answer(&tasks, "answer").await.unwrap();
        let err = session.submit_answer(&tasks, "again").await.unwrap_err();
        assert_eq!(err, SessionError::NoPendingQuestion);
    }

    #[tokio::test]
    async fn test_ended_session_rejects_mutations_and_keeps_turns() {
        let tasks = runner_replying("A question");
        let mut session = InterviewSession::start("Backend Engineer").unwrap();
        session.request_question(&tasks).await.unwrap();

        session.end();
        assert!(!session.is_active());

        let err = session.request_question(&tasks).await.unwrap_err();
        assert_eq!(err, SessionError::NotActive);
        let err = session.submit_answer(&tasks, "late answer").await.unwrap_err();
        assert_eq!(err, SessionError::NotActive);

        assert_eq!(session.turns().len(), 1);
        assert!(session.turns()[0].answer.is_none());
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut session = InterviewSession::start("Backend Engineer").unwrap();
        session.end();
        session.end();
        assert!(!session.is_active());
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_evaluation_prompt_carries_role_question_and_answer() {
        let completer = Arc::new(RecordingCompleter::replying("Q or eval"));
        let tasks = TaskRunner::new(completer.clone());
        let mut session = InterviewSession::start("Data Scientist").unwrap();

        session.request_question(&tasks).await.unwrap();
        session.submit_answer(&tasks, "Gradient boosting.").await.unwrap();

        let prompts = completer.seen();
        assert_eq!(prompts.len(), 2);
        let evaluation_prompt = &prompts[1];
        assert!(evaluation_prompt.contains("Data Scientist"));
        assert!(evaluation_prompt.contains("Q or eval"));
        assert!(evaluation_prompt.contains("Gradient boosting."));
    }
}
