use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tokio::sync::oneshot;

use crate::{AdapterError, AuthorizationCallback};

type CallbackResult = Result<AuthorizationCallback, AdapterError>;
pub(super) type CallbackReceiver = oneshot::Receiver<CallbackResult>;
pub(super) type SharedCallbackSender = Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>;

#[derive(Clone)]
pub(super) struct CallbackState {
    pub(super) success_html: &'static str,
    pub(super) error_html: &'static str,
    pub(super) callback_tx: SharedCallbackSender,
}

/// Delivers the first outcome; later ones are dropped.
pub(super) fn send_callback(callback_tx: &SharedCallbackSender, callback: CallbackResult) {
    if let Ok(mut guard) = callback_tx.lock() {
        if let Some(sender) = guard.take() {
            let _ = sender.send(callback);
        }
    }
}

pub(super) async fn callback_handler(
    State(state): State<CallbackState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let CallbackState {
        success_html,
        error_html,
        callback_tx,
    } = state;

    match AuthorizationCallback::from_query(&query.unwrap_or_default()) {
        Ok(callback) => {
            send_callback(&callback_tx, Ok(callback));
            (StatusCode::OK, Html(success_html))
        }
        // Stray hits on the redirect path keep the listener waiting.
        Err(AdapterError::MissingAuthorizationCode) => {
            (StatusCode::BAD_REQUEST, Html(error_html))
        }
        Err(error) => {
            send_callback(&callback_tx, Err(error));
            (StatusCode::FORBIDDEN, Html(error_html))
        }
    }
}

pub(super) async fn fallback_handler(State(state): State<CallbackState>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(state.error_html))
}

pub(super) async fn wait_for_callback(
    callback_rx: CallbackReceiver,
    timeout: Option<Duration>,
) -> Result<AuthorizationCallback, AdapterError> {
    let received = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, callback_rx)
            .await
            .map_err(|_| AdapterError::LocalServerTimeout { timeout })?,
        None => callback_rx.await,
    };

    received.map_err(|_| AdapterError::InvalidResponse {
        message: "local server callback channel closed".to_string(),
        body: String::new(),
    })?
}
