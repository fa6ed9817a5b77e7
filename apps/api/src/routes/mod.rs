pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::interview::handlers as interview_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis API
        .route(
            "/api/v1/resumes/analyze",
            post(analysis_handlers::handle_analyze),
        )
        .route("/api/v1/resumes/ats", post(analysis_handlers::handle_ats))
        .route(
            "/api/v1/resumes/summary",
            post(analysis_handlers::handle_summary),
        )
        // Interview API
        .route("/api/v1/interview", get(interview_handlers::handle_get))
        .route(
            "/api/v1/interview/start",
            post(interview_handlers::handle_start),
        )
        .route(
            "/api/v1/interview/question",
            post(interview_handlers::handle_question),
        )
        .route(
            "/api/v1/interview/answer",
            post(interview_handlers::handle_answer),
        )
        .route(
            "/api/v1/interview/end",
            post(interview_handlers::handle_end),
        )
        .with_state(state)
}
