//! HTTP + WebSocket presentation feed
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /match/new - Create and start a match
//! - GET /match/{id} - Current snapshot
//! - POST /match/{id}/frame - Feed one perception frame, get snapshot + cues
//! - POST /match/{id}/restart - Restart a finished match
//! - WS /ws/{id} - Live snapshots
//!
//! Matches live in memory only. The camera client posts landmark frames;
//! every frame that changes something is broadcast to the match's sockets.

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::config::MatchConfig;
use crate::core::duel::Duel;
use crate::error::DuelError;
use crate::types::{BeatCue, HandObservation, MatchSnapshot};
use crate::MAX_HANDS;

/// One live match
#[derive(Debug)]
pub struct MatchSession {
    pub id: String,
    pub duel: Duel,
    /// Timestamp of the newest frame seen
    pub last_frame_ms: u64,
    pub update_tx: broadcast::Sender<MatchSnapshot>,
}

/// App state
pub struct AppState {
    pub matches: RwLock<HashMap<String, MatchSession>>,
    /// Template for new matches
    pub config: MatchConfig,
}

/// Create match request
#[derive(Debug, Default, Deserialize)]
pub struct NewMatchRequest {
    /// Seed for a reproducible opponent
    pub seed: Option<u64>,
}

/// Create match response
#[derive(Debug, Serialize, Deserialize)]
pub struct NewMatchResponse {
    pub match_id: String,
    pub websocket_url: String,
}

/// One perception frame
#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    pub timestamp_ms: u64,
    /// Each hand is validated to exactly 21 keypoints on decode
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

/// Snapshot after a frame, plus the sounds that frame triggered
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    #[serde(flatten)]
    pub snapshot: MatchSnapshot,
    pub cues: Vec<BeatCue>,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub matches_active: usize,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(err: DuelError) -> ApiError {
    let status = match err {
        DuelError::LandmarkCount { .. } | DuelError::TooManyHands { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DuelError::RestartRejected { .. } => StatusCode::CONFLICT,
        DuelError::BeatIntervalOutOfRange { .. }
        | DuelError::InvalidConfig(_)
        | DuelError::UnknownGesture(_)
        | DuelError::Json(_) => StatusCode::BAD_REQUEST,
        DuelError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { error: format!("no match '{}'", id) }),
    )
}

/// Create the API router
pub fn create_router(config: MatchConfig) -> Router {
    let state = Arc::new(AppState {
        matches: RwLock::new(HashMap::new()),
        config,
    });

    Router::new()
        .route("/health", get(health))
        .route("/match/new", post(create_match))
        .route("/match/:id", get(get_match))
        .route("/match/:id/frame", post(post_frame))
        .route("/match/:id/restart", post(restart_match))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let matches = state.matches.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        matches_active: matches.len(),
    })
}

/// Create and start a match
async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewMatchRequest>,
) -> Json<NewMatchResponse> {
    let match_id = generate_match_id();
    let (tx, _) = broadcast::channel(100);

    let mut config = state.config.clone();
    if req.seed.is_some() {
        config.ai_seed = req.seed;
    }
    let mut duel = Duel::new(config);
    duel.start_match(0);

    let session = MatchSession {
        id: match_id.clone(),
        duel,
        last_frame_ms: 0,
        update_tx: tx,
    };

    state.matches.write().await.insert(match_id.clone(), session);
    info!(match_id = %match_id, "match created");

    Json(NewMatchResponse {
        websocket_url: format!("/ws/{}", match_id),
        match_id,
    })
}

/// Current snapshot
async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MatchSnapshot>, ApiError> {
    let matches = state.matches.read().await;
    let session = matches.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(session.duel.snapshot()))
}

/// Feed one perception frame
async fn post_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FrameRequest>,
) -> Result<Json<FrameResponse>, ApiError> {
    if req.hands.len() > MAX_HANDS {
        return Err(reject(DuelError::TooManyHands { max: MAX_HANDS, got: req.hands.len() }));
    }

    let mut matches = state.matches.write().await;
    let session = matches.get_mut(&id).ok_or_else(|| not_found(&id))?;

    session.last_frame_ms = session.last_frame_ms.max(req.timestamp_ms);
    let report = session.duel.tick(req.timestamp_ms, &req.hands);
    let snapshot = session.duel.snapshot();

    if report.changed() {
        debug!(match_id = %id, event = ?report.event, "frame changed match state");
        // No subscribers is not an error
        let _ = session.update_tx.send(snapshot.clone());
    }

    Ok(Json(FrameResponse { snapshot, cues: report.cues() }))
}

/// Restart a finished match
async fn restart_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MatchSnapshot>, ApiError> {
    let mut matches = state.matches.write().await;
    let session = matches.get_mut(&id).ok_or_else(|| not_found(&id))?;

    let now_ms = session.last_frame_ms;
    session.duel.restart_after_terminal(now_ms).map_err(reject)?;

    let snapshot = session.duel.snapshot();
    let _ = session.update_tx.send(snapshot.clone());
    info!(match_id = %id, "match restarted");
    Ok(Json(snapshot))
}

/// WebSocket handler for live snapshots
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let matches = state.matches.read().await;
    let session = matches.get(&id).ok_or_else(|| not_found(&id))?;
    let rx = session.update_tx.subscribe();
    let current = session.duel.snapshot();
    drop(matches);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, current, rx).await;
    }))
}

/// Push the current snapshot, then every broadcast one, until either side closes
async fn handle_websocket(
    socket: WebSocket,
    current: MatchSnapshot,
    mut rx: broadcast::Receiver<MatchSnapshot>,
) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        let json = serde_json::to_string(&current).unwrap_or_default();
        if sender.send(Message::Text(json)).await.is_err() {
            return;
        }
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    let json = serde_json::to_string(&snapshot).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Generate match ID
fn generate_match_id() -> String {
    format!("match_{:016x}", rand::random::<u64>())
}

/// Run the API server
pub async fn run_server(addr: &str, config: MatchConfig) -> crate::Result<()> {
    config.validate()?;
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("qiduel API listening on {}", addr);
    println!("✊ qiduel API running on {}", addr);
    println!("  POST /match/new          - Create match");
    println!("  GET  /match/:id          - Get snapshot");
    println!("  POST /match/:id/frame    - Feed landmark frame");
    println!("  POST /match/:id/restart  - Restart finished match");
    println!("  WS   /ws/:id             - Live snapshots");
    println!("  GET  /health             - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
