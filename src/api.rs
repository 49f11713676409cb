//! HTTP API endpoints for the game front-end.
//!
//! The UI is a thin client: every user action maps to one endpoint, and the
//! response never includes the hidden fourth line of an open question.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::GamePhase;

/// Spoiler-free projection of the current question
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// 1-based position within the round
    pub question_number: usize,
    pub total_questions: usize,
    /// The three shown lines; the fourth is withheld until answered
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

/// Final score of a finished round
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub score: usize,
    pub total: usize,
}

/// Response structure for the overall game state
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub phase: GamePhase,
    pub total_verses: usize,
    pub played_count: usize,
    pub has_saved_session: bool,
    /// True when the verse store failed to load (empty store)
    pub load_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreView>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StartRoundRequest {
    /// Shared round token; omitted for a random round
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub token: String,
}

async fn state_response(state: &AppState) -> StateResponse {
    let session = state.current_session().await;

    let question = session.current_verse().map(|verse| QuestionView {
        question_number: session.current_index + 1,
        total_questions: session.round.len(),
        lines: verse.shown_lines().to_vec(),
        attribution: verse.attribution.clone(),
    });

    let score = match session.phase {
        GamePhase::Finished => Some(ScoreView {
            score: session.score(),
            total: session.round.len(),
        }),
        _ => None,
    };

    StateResponse {
        phase: session.phase,
        total_verses: state.verses.len(),
        played_count: state.played_count().await,
        has_saved_session: state.has_saved_session().await,
        load_failed: state.verses.is_empty(),
        question,
        score,
    }
}

/// Current game state.
///
/// GET /api/state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(state_response(&state).await)
}

/// Start a new round, shared when a token is given.
///
/// POST /api/round
pub async fn start_round(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRoundRequest>,
) -> Response {
    let result = match req.token.as_deref() {
        Some(token) => state.start_shared_round(token).await,
        None => state.start_round().await,
    };

    match result {
        Ok(_) => Json(state_response(&state).await).into_response(),
        Err(e) => (StatusCode::CONFLICT, e).into_response(),
    }
}

/// Resume the saved round.
///
/// POST /api/round/resume
pub async fn resume_round(State(state): State<Arc<AppState>>) -> Response {
    match state.resume().await {
        Ok(_) => Json(state_response(&state).await).into_response(),
        Err(e) => (StatusCode::CONFLICT, e).into_response(),
    }
}

/// Submit an answer for the current question.
///
/// POST /api/answer
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Answer must not be empty").into_response();
    }

    match state.submit_answer(&req.text).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => (StatusCode::CONFLICT, e).into_response(),
    }
}

/// Return to the start screen, keeping an active round resumable.
///
/// POST /api/home
pub async fn go_home(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    state.go_home().await;
    Json(state_response(&state).await)
}

/// Clear the played-verse ledger.
///
/// POST /api/progress/reset
pub async fn reset_progress(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    state.reset_progress().await;
    Json(state_response(&state).await)
}

/// Share token for the current round.
///
/// GET /api/share
pub async fn share_round(State(state): State<Arc<AppState>>) -> Response {
    match state.share_token().await {
        Ok(token) => Json(ShareResponse { token }).into_response(),
        Err(e) => (StatusCode::CONFLICT, e).into_response(),
    }
}
