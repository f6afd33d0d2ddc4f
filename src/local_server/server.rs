use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Router, routing::get};
use tokio::net::TcpListener as TokioTcpListener;
use tokio::sync::oneshot;

use crate::{AdapterError, AuthorizationCallback};

use super::http::{
    CallbackState, callback_handler, fallback_handler, send_callback, wait_for_callback,
};
use super::target::RedirectTarget;

const SUCCESS_HTML: &str = include_str!("success.html");
const ERROR_HTML: &str = include_str!("error.html");

#[derive(Debug, Clone)]
pub struct LocalServer {
    target: RedirectTarget,
    timeout: Option<Duration>,
}

impl LocalServer {
    pub fn new(redirect_uri: impl Into<String>) -> Result<Self, AdapterError> {
        let redirect_uri = redirect_uri.into();
        Ok(Self {
            target: RedirectTarget::parse(&redirect_uri)?,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn bind(&self) -> Result<TcpListener, AdapterError> {
        let listener = TcpListener::bind((self.target.host.as_str(), self.target.port))?;
        Ok(listener)
    }

    /// Serves the redirect path on `listener` until a callback carries a code,
    /// a provider error, or the timeout elapses.
    pub async fn listen_with_async(
        &self,
        listener: TcpListener,
    ) -> Result<AuthorizationCallback, AdapterError> {
        let (callback_tx, callback_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let callback_tx = Arc::new(Mutex::new(Some(callback_tx)));

        let state = CallbackState {
            success_html: SUCCESS_HTML,
            error_html: ERROR_HTML,
            callback_tx: callback_tx.clone(),
        };

        let app = Router::new()
            .route(&self.target.path, get(callback_handler))
            .fallback(fallback_handler)
            .with_state(state);

        listener.set_nonblocking(true)?;
        let listener = TokioTcpListener::from_std(listener)?;

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        let callback_tx_for_server = callback_tx.clone();
        let server_handle = tokio::spawn(async move {
            if let Err(err) = server.await {
                send_callback(&callback_tx_for_server, Err(AdapterError::Io(err)));
            }
        });

        let callback = wait_for_callback(callback_rx, self.timeout).await;

        let _ = shutdown_tx.send(());
        let _ = server_handle.await;

        callback
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use super::LocalServer;
    use crate::AdapterError;

    fn loopback() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    #[tokio::test]
    async fn captures_code_from_redirect() {
        let (listener, base) = loopback();
        let server = LocalServer::new("http://127.0.0.1:0/callback").unwrap();
        let handle = tokio::spawn(async move { server.listen_with_async(listener).await });

        let stray = reqwest::get(format!("{base}/callback")).await.unwrap();
        assert_eq!(stray.status(), reqwest::StatusCode::BAD_REQUEST);

        let unknown = reqwest::get(format!("{base}/favicon.ico")).await.unwrap();
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);

        let response = reqwest::get(format!(
            "{base}/callback?code=abc123&scope=user%3Aread%3Aemail"
        ))
        .await
        .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response.text().await.unwrap().contains("Signed in with Twitch"));

        let callback = handle.await.unwrap().unwrap();
        assert_eq!(callback.code, "abc123");
    }

    #[tokio::test]
    async fn denied_consent_ends_the_wait() {
        let (listener, base) = loopback();
        let server = LocalServer::new("http://127.0.0.1:0/").unwrap();
        let handle = tokio::spawn(async move { server.listen_with_async(listener).await });

        let response = reqwest::get(format!(
            "{base}/?error=access_denied&error_description=The+user+denied+you+access"
        ))
        .await
        .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);

        let error = handle.await.unwrap().unwrap_err();
        assert_eq!(error.to_string(), "The user denied you access");
    }

    #[tokio::test]
    async fn times_out_without_callback() {
        let (listener, _) = loopback();
        let server = LocalServer::new("http://127.0.0.1:0/callback")
            .unwrap()
            .with_timeout(Duration::from_millis(50));

        let error = server.listen_with_async(listener).await.unwrap_err();
        assert!(matches!(error, AdapterError::LocalServerTimeout { .. }));
    }
}
