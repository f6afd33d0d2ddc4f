#[cfg(feature = "local-server")]
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderValue};
use serde::de::DeserializeOwned;

use crate::{
    AdapterConfig, AdapterError, HelixUsersResponse, OAuth2Adapter, TokenResponse, UserProfile,
};
#[cfg(feature = "local-server")]
use crate::LocalServer;

// References:
// - https://dev.twitch.tv/docs/authentication/getting-tokens-oauth/#authorization-code-grant-flow
// - https://dev.twitch.tv/docs/api/reference/#get-users

const SCOPE: &str = "user:read:email";
const CLIENT_ID_HEADER: &str = "Client-Id";
const ICON: &str = include_str!("twitch.svg");

#[derive(Debug, Clone)]
pub struct TwitchAdapter {
    config: AdapterConfig,
    http: Client,
}

impl TwitchAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    /// Use a preconfigured client, e.g. one with a request timeout.
    pub fn with_http_client(config: AdapterConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn auth_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPE)
            .append_pair("force_verify", "true")
            .finish();
        format!("{}?{query}", self.config.endpoints.authorize_url)
    }

    pub async fn token_from_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<UserProfile, AdapterError> {
        let access_token = self.exchange_code(code, redirect_uri).await?;
        let users = self.fetch_users(&access_token).await?;

        let user = users
            .into_first_user()
            .ok_or(AdapterError::ProfileIncomplete)?;
        UserProfile::try_from(user)
    }

    pub fn icon(&self) -> &'static str {
        ICON
    }

    /// Binds the configured redirect URI locally, hands the consent URL to
    /// `on_authorize` and exchanges the code from the first valid callback.
    #[cfg(feature = "local-server")]
    pub async fn run_local_flow<F>(
        &self,
        timeout: Option<Duration>,
        on_authorize: F,
    ) -> Result<UserProfile, AdapterError>
    where
        F: FnOnce(&str) -> Result<(), AdapterError>,
    {
        let mut server = LocalServer::new(self.config.redirect_uri.clone())?;
        if let Some(timeout) = timeout {
            server = server.with_timeout(timeout);
        }
        let listener = server.bind()?;

        on_authorize(&self.auth_url())?;

        let callback = server.listen_with_async(listener).await?;
        self.token_from_code(&callback.code, &self.config.redirect_uri)
            .await
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AdapterError> {
        let payload = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http
            .post(self.config.endpoints.token_url.as_str())
            .form(&payload)
            .send()
            .await?;
        let body = response.text().await?;
        let token: TokenResponse = parse_body(&body)?;

        if let Some(message) = token.failure_message() {
            tracing::error!(
                error = token.error.as_deref().unwrap_or_default(),
                %message,
                "twitch token exchange failed"
            );
            return Err(AdapterError::UpstreamAuth(message));
        }

        token
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AdapterError::InvalidResponse {
                message: "token response is missing access_token".to_string(),
                body,
            })
    }

    async fn fetch_users(&self, access_token: &str) -> Result<HelixUsersResponse, AdapterError> {
        let client_id = HeaderValue::from_str(&self.config.client_id).map_err(|_| {
            AdapterError::InvalidHeader {
                name: CLIENT_ID_HEADER.to_string(),
                value: self.config.client_id.clone(),
            }
        })?;

        let response = self
            .http
            .get(self.config.endpoints.users_url.as_str())
            .bearer_auth(access_token)
            .header(CLIENT_ID_HEADER, client_id)
            .send()
            .await?;
        let body = response.text().await?;
        parse_body(&body)
    }
}

#[async_trait]
impl OAuth2Adapter for TwitchAdapter {
    fn id(&self) -> &'static str {
        "twitch"
    }

    fn auth_url(&self) -> String {
        TwitchAdapter::auth_url(self)
    }

    async fn token_from_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<UserProfile, AdapterError> {
        TwitchAdapter::token_from_code(self, code, redirect_uri).await
    }

    fn icon(&self) -> &str {
        TwitchAdapter::icon(self)
    }
}

// Status codes are not checked: Twitch error bodies are JSON and are classified
// by their fields.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AdapterError> {
    serde_json::from_str(body).map_err(|err| AdapterError::InvalidResponse {
        message: err.to_string(),
        body: body.to_string(),
    })
}
