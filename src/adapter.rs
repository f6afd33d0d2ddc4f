use async_trait::async_trait;

use crate::{AdapterError, UserProfile};

/// Identity-provider plugin surface a host login flow drives.
///
/// The host owns CSRF state, redirects and sessions; an adapter only builds
/// the consent URL, turns the returned code into a [`UserProfile`] and
/// supplies an icon for the login button.
#[async_trait]
pub trait OAuth2Adapter: Send + Sync {
    fn id(&self) -> &'static str;

    fn auth_url(&self) -> String;

    /// Exchanges `code` and fetches the user's profile. `redirect_uri` must be
    /// the one the code was issued for.
    async fn token_from_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<UserProfile, AdapterError>;

    fn icon(&self) -> &str;
}
