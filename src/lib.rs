//! Twitch OAuth 2.0 identity adapter.
//!
//! Builds the consent URL, exchanges the returned authorization code for the
//! user's Twitch profile and supplies a login-button icon. Sessions, CSRF
//! state and user storage stay with the host framework.

mod adapter;
mod config;
mod error;
#[cfg(feature = "local-server")]
mod local_server;
mod providers;
mod types;

pub use adapter::OAuth2Adapter;
pub use config::{AdapterConfig, TwitchEndpoints};
pub use error::AdapterError;
#[cfg(feature = "local-server")]
pub use local_server::LocalServer;
pub use providers::TwitchAdapter;
pub use types::{AuthorizationCallback, HelixUser, HelixUsersResponse, TokenResponse, UserProfile};
