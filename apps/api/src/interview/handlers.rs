//! Axum route handlers for the interview API.
//!
//! The live session sits behind `AppState::interview`; every mutation locks
//! it and runs to completion before the lock is released, which gives the
//! session the single-writer discipline it requires.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::{InterviewSession, InterviewTurn};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub index: usize,
    pub question: String,
    pub answer: Option<String>,
    pub evaluation: Option<String>,
}

impl TurnView {
    fn from_turn(index: usize, turn: &InterviewTurn) -> Self {
        Self {
            index,
            question: turn.question.clone(),
            answer: turn.answer.clone(),
            evaluation: turn.evaluation.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub role: String,
    pub active: bool,
    pub turns: Vec<TurnView>,
}

impl SessionView {
    fn from_session(session: &InterviewSession) -> Self {
        Self {
            role: session.role().to_string(),
            active: session.is_active(),
            turns: session
                .turns()
                .iter()
                .enumerate()
                .map(|(index, turn)| TurnView::from_turn(index, turn))
                .collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/start
///
/// Starts a fresh session for `role`, replacing any previous one.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = InterviewSession::start(&request.role)?;
    let view = SessionView::from_session(&session);
    *state.interview.lock().await = Some(session);
    Ok(Json(view))
}

/// POST /api/v1/interview/question
///
/// Appends a freshly generated question and returns it as the current turn.
pub async fn handle_question(
    State(state): State<AppState>,
) -> Result<Json<TurnView>, AppError> {
    let mut guard = state.interview.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let turn = session.request_question(&state.tasks).await?.clone();
    let index = session.turns().len() - 1;
    Ok(Json(TurnView::from_turn(index, &turn)))
}

/// POST /api/v1/interview/answer
///
/// Submits the candidate's answer for the current turn and returns the turn
/// with its evaluation filled in.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<TurnView>, AppError> {
    let mut guard = state.interview.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let turn = session
        .submit_answer(&state.tasks, &request.answer)
        .await?
        .clone();
    let index = session.turns().len() - 1;
    Ok(Json(TurnView::from_turn(index, &turn)))
}

/// POST /api/v1/interview/end
///
/// Ends the session. Idempotent; the final snapshot is returned for review.
pub async fn handle_end(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut guard = state.interview.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    session.end();
    Ok(Json(SessionView::from_session(session)))
}

/// GET /api/v1/interview
///
/// Current session snapshot.
pub async fn handle_get(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let guard = state.interview.lock().await;
    let session = guard.as_ref().ok_or_else(no_session)?;
    Ok(Json(SessionView::from_session(session)))
}

fn no_session() -> AppError {
    AppError::NotFound("no interview session has been started".to_string())
}
