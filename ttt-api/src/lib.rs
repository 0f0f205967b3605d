//! Tic-tac-toe text-message service.
//!
//! Each sender plays X against the minimax AI playing O. Commands arrive as
//! JSON on `POST /execute` and answer with the chat replies to send back:
//!
//! - `start` begins a new game (replacing any existing one)
//! - `place` with `position` = "1".."9" plays a cell, then lets the AI answer
//!
//! Games live in memory only and expire after a configurable age.

pub mod render;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use ttt_core::{ai, Player, Position};

use crate::render::{board_message, game_over_message};
use crate::session::{RunningGame, Sessions, HUMAN};

// =============================================================================
// State
// =============================================================================

/// Shared application state
#[derive(Debug, Default)]
pub struct AppStateInner {
    pub sessions: Sessions,
}

pub type AppState = Arc<AppStateInner>;

pub fn new_state() -> AppState {
    Arc::new(AppStateInner::default())
}

// =============================================================================
// JSON Models
// =============================================================================

/// A command sent by a chat user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Sender address, e.g. a phone number
    pub from: String,
    pub command: String,
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

/// Final answer to a command, shown after the replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum CommandResponse {
    /// Plain message
    Text(String),
    /// Problem with the request the user can fix
    Status(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Messages to send back, in order
    pub replies: Vec<String>,
    pub response: Option<CommandResponse>,
}

#[derive(Serialize)]
struct GameStateModel {
    cells: [Player; 9],
    turn: Player,
    turns: u32,
    winner: Player,
    ended: bool,
    /// Cell indices of the completed line, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_line: Option<Vec<usize>>,
    rendered: String,
}

#[derive(Serialize)]
struct HintModel {
    index: usize,
    row: u8,
    col: u8,
    /// Minimax value for the human player: 1 (win), 0 (draw), -1 (loss)
    value: i8,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Serialize)]
struct ErrorModel {
    detail: String,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("no game found for {0}")]
    NoGame(String),
    #[error("search task failed: {0}")]
    Search(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownCommand(_) => StatusCode::BAD_REQUEST,
            ApiError::NoGame(_) => StatusCode::NOT_FOUND,
            ApiError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorModel {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Commands
// =============================================================================

const NEW_GAME: &str = "A new game has started. It is now your turn.";
const OVERRIDDEN_GAME: &str =
    "An existing game was overridden. A new game has started. It is now your turn.";
const NO_GAME: &str = "No game found. Please start a new game.";
const INVALID_POSITION: &str = "Invalid position. Please provide a number between 1 and 9.";
const INVALID_MOVE: &str = "Invalid move. Please try again.";
const YOU_PLACED: &str = "You just placed:";
const AI_PLACED: &str = "In return, the AI placed:";

/// Parse a 1-based cell number as typed by the user.
fn parse_position(arg: Option<&str>) -> Option<Position> {
    let n: i32 = arg?.trim().parse().ok()?;
    Position::from_index(n.checked_sub(1)?).ok()
}

async fn start_game(sessions: &Sessions, from: &str) -> ExecuteResponse {
    debug!(from = %from, "starting new game");

    let (running, replaced) = sessions.start(from, Instant::now()).await;
    let greeting = if replaced { OVERRIDDEN_GAME } else { NEW_GAME };

    ExecuteResponse {
        replies: vec![
            greeting.to_string(),
            board_message("", running.game.board()),
        ],
        response: None,
    }
}

/// Why a move was not played: the game is over, or the cell was taken.
fn move_failed(running: &RunningGame) -> CommandResponse {
    match game_over_message(running.game.state()) {
        Some(message) => CommandResponse::Text(message),
        None => CommandResponse::Status(INVALID_MOVE.to_string()),
    }
}

/// Play the user's cell, then the AI's answer.
///
/// The engine accepts moves on a won board that still has empty cells, so
/// the finished-game check happens here before anything is played.
fn place_piece(running: &mut RunningGame, position: Option<&str>) -> ExecuteResponse {
    let mut out = ExecuteResponse::default();

    let Some(pos) = parse_position(position) else {
        out.response = Some(CommandResponse::Status(INVALID_POSITION.to_string()));
        return out;
    };

    if let Some(message) = game_over_message(running.game.state()) {
        out.response = Some(CommandResponse::Text(message));
        return out;
    }

    if !running.game.make_move(pos) {
        out.response = Some(move_failed(running));
        return out;
    }
    out.replies.push(board_message(YOU_PLACED, running.game.board()));

    let ai = running.ai;
    if !ai.make_move(&mut running.game) {
        out.response = Some(move_failed(running));
        return out;
    }
    out.replies.push(board_message(AI_PLACED, running.game.board()));

    out.response = game_over_message(running.game.state()).map(CommandResponse::Text);
    out
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    match req.command.as_str() {
        "start" => Ok(Json(start_game(&state.sessions, &req.from).await)),
        "place" => {
            let position = req.arguments.get("position").map(String::as_str);
            debug!(from = %req.from, ?position, "placing piece");

            let response = state
                .sessions
                .with_game(&req.from, |running| place_piece(running, position))
                .await
                .unwrap_or_else(|| ExecuteResponse {
                    replies: Vec::new(),
                    response: Some(CommandResponse::Status(NO_GAME.to_string())),
                });
            Ok(Json(response))
        }
        other => Err(ApiError::UnknownCommand(other.to_string())),
    }
}

async fn get_game(
    State(state): State<AppState>,
    Path(from): Path<String>,
) -> Result<Json<GameStateModel>, ApiError> {
    let running = state.sessions.get(&from).await.ok_or(ApiError::NoGame(from))?;
    let game = running.game;
    let game_state = game.state();

    Ok(Json(GameStateModel {
        cells: game.board().cells(),
        turn: game.turn(),
        turns: game.turns(),
        winner: game_state.winner,
        ended: game_state.ended,
        winning_line: game
            .board()
            .winning_line()
            .map(|line| line.iter().map(|pos| pos.index()).collect()),
        rendered: board_message("", game.board()),
    }))
}

async fn get_hints(
    State(state): State<AppState>,
    Path(from): Path<String>,
) -> Result<Json<Vec<HintModel>>, ApiError> {
    let running = state.sessions.get(&from).await.ok_or(ApiError::NoGame(from))?;

    // Search on a copy, outside the session lock.
    let game = running.game;
    let evals = tokio::task::spawn_blocking(move || ai::evaluate_moves(&game, HUMAN)).await?;

    Ok(Json(
        evals
            .into_iter()
            .map(|e| HintModel {
                index: e.position.index(),
                row: e.position.row,
                col: e.position.col,
                value: e.value,
            })
            .collect(),
    ))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/execute", post(execute))
        .route("/games/{from}", get(get_game))
        .route("/games/{from}/hints", get(get_hints))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
