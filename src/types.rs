use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::AdapterError;

/// Query parameters Twitch appends to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub code: String,
}

impl AuthorizationCallback {
    pub fn from_query(query: &str) -> Result<Self, AdapterError> {
        let mut code = None;
        let mut error = None;
        let mut error_description = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(AdapterError::UpstreamAuth(
                non_empty(error_description).unwrap_or(error),
            ));
        }

        match non_empty(code) {
            Some(code) => Ok(Self { code }),
            None => Err(AdapterError::MissingAuthorizationCode),
        }
    }

    pub fn from_url(callback_url: &str) -> Result<Self, AdapterError> {
        let url = Url::parse(callback_url)?;
        Self::from_query(url.query().unwrap_or(""))
    }
}

/// Body of `POST /oauth2/token`, success or failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenResponse {
    /// Message describing why the exchange failed, if it did.
    ///
    /// `error_description` wins over `error`. Twitch also answers some failures
    /// with a bare `{"status": 400, "message": "..."}` body and no token.
    pub fn failure_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            let description = non_empty(self.error_description.clone());
            return Some(description.unwrap_or_else(|| error.clone()));
        }

        if self.access_token.as_deref().is_some_and(|token| !token.is_empty()) {
            return None;
        }

        self.extra
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    }
}

/// Body of `GET /helix/users`. Any field may be absent or `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelixUsersResponse {
    pub data: Option<Vec<HelixUser>>,
}

impl HelixUsersResponse {
    pub fn into_first_user(self) -> Option<HelixUser> {
        self.data.unwrap_or_default().into_iter().next()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelixUser {
    pub id: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub email: Option<String>,
}

/// Normalized identity handed back to the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub profile_picture_url: String,
    pub full_name: String,
}

impl TryFrom<HelixUser> for UserProfile {
    type Error = AdapterError;

    fn try_from(user: HelixUser) -> Result<Self, Self::Error> {
        let email = non_empty(user.email).ok_or(AdapterError::ProfileIncomplete)?;
        Ok(Self {
            email,
            profile_picture_url: user.profile_image_url.unwrap_or_default(),
            full_name: user.display_name.unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
