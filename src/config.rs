const AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const USERS_URL: &str = "https://api.twitch.tv/helix/users";

pub(crate) const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitchEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub users_url: String,
}

impl Default for TwitchEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            users_url: USERS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Sent in the consent URL. The code exchange uses whatever the host passes.
    pub redirect_uri: String,
    pub endpoints: TwitchEndpoints,
}

impl AdapterConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            endpoints: TwitchEndpoints::default(),
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: TwitchEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}
