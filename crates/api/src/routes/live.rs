//! Live dashboard over WebSocket.
//!
//! The client sends a JSON `FilterSelection` on every filter change and gets
//! back one frame per selection. A new selection aborts the refresh still
//! running for the previous one, and a result that arrives after a newer
//! selection is dropped instead of sent.

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use lavra_core::dashboard::RefreshTracker;
use lavra_core::dimension::FilterSelection;
use lavra_shared::AppError;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::render::DashboardResponse;

/// Outbound frames buffered per connection.
const FRAME_BUFFER: usize = 8;

/// Creates the live dashboard route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/live", get(live_dashboard))
}

/// Frame sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveFrame {
    /// Panels for the latest selection.
    Snapshot(Box<DashboardResponse>),
    /// The refresh or the request failed.
    Error {
        /// Error code.
        error: &'static str,
        /// Error description.
        message: String,
    },
}

impl LiveFrame {
    fn from_error(err: ApiError) -> Self {
        Self::Error {
            error: err.0.error_code(),
            message: err.0.to_string(),
        }
    }

    fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","error":"INTERNAL_ERROR","message":"{e}"}}"#)
        })
    }
}

/// Runs refreshes for one connection, keeping only the latest one alive.
pub struct LiveRefresher {
    state: AppState,
    tracker: RefreshTracker,
    in_flight: Option<JoinHandle<()>>,
    frames: mpsc::Sender<String>,
}

impl LiveRefresher {
    /// Creates a refresher that sends encoded frames to `frames`.
    #[must_use]
    pub fn new(state: AppState, frames: mpsc::Sender<String>) -> Self {
        Self {
            state,
            tracker: RefreshTracker::new(),
            in_flight: None,
            frames,
        }
    }

    /// Starts a refresh for `selection`, superseding the previous one.
    pub fn submit(&mut self, selection: FilterSelection) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let ticket = self.tracker.begin();
        let state = self.state.clone();
        let frames = self.frames.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let frame = match state.dashboard.refresh(&selection).await {
                Ok(snapshot) => LiveFrame::Snapshot(Box::new(DashboardResponse::from_snapshot(
                    &snapshot,
                    &state.options,
                ))),
                Err(e) => LiveFrame::from_error(ApiError::from(e)),
            };

            if let Err(e) = ticket.ensure_current() {
                debug!(generation = ticket.generation(), reason = %e, "dropping stale frame");
                return;
            }
            let _ = frames.send(frame.encode()).await;
        }));
    }

    /// Reports a message that could not be read as a selection.
    pub async fn reject(&self, message: String) {
        let frame = LiveFrame::from_error(ApiError(AppError::Validation(message)));
        let _ = self.frames.send(frame.encode()).await;
    }

    /// Aborts the refresh still running, if any.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!("aborted in-flight refresh");
        }
    }
}

impl Drop for LiveRefresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// GET /dashboard/live
async fn live_dashboard(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| live_session(socket, state))
}

async fn live_session(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(FRAME_BUFFER);

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let mut refresher = LiveRefresher::new(state, tx);
    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "live socket read failed");
                break;
            }
        };

        match serde_json::from_str::<FilterSelection>(text.as_str()) {
            Ok(selection) => refresher.submit(selection),
            Err(e) => refresher.reject(format!("Invalid selection: {e}")).await,
        }
    }

    drop(refresher);
    let _ = writer.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_newer_selection_supersedes_older() {
        let (tx, mut rx) = mpsc::channel(FRAME_BUFFER);
        let mut refresher = LiveRefresher::new(test_state().await, tx);

        refresher.submit(FilterSelection::new().with_region("SP"));
        refresher.submit(FilterSelection::new().with_region("MG"));

        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "snapshot");
        assert_eq!(frame["selection"]["regions"], serde_json::json!(["MG"]));

        if let Some(handle) = refresher.in_flight.take() {
            handle.await.unwrap();
        }
        drop(refresher);
        assert!(rx.recv().await.is_none(), "superseded refresh must not send");
    }

    #[tokio::test]
    async fn test_invalid_selection_is_rejected() {
        let (tx, mut rx) = mpsc::channel(FRAME_BUFFER);
        let refresher = LiveRefresher::new(test_state().await, tx);

        refresher.reject("Invalid selection: expected value".into()).await;

        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unreachable_dataset_sends_error_frame() {
        let state = test_state().await;
        (*state.db).clone().close().await.unwrap();
        let (tx, mut rx) = mpsc::channel(FRAME_BUFFER);
        let mut refresher = LiveRefresher::new(state, tx);

        refresher.submit(FilterSelection::new());

        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "error");
        assert_eq!(frame["error"], "DATA_SOURCE_UNAVAILABLE");
    }
}
