use url::Url;

use crate::AdapterError;

/// Where the loopback listener binds and which path it serves.
#[derive(Debug, Clone)]
pub(super) struct RedirectTarget {
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) path: String,
}

impl RedirectTarget {
    /// Only plain `http` is accepted: the listener binds a loopback socket
    /// without TLS, so an `https` redirect could never reach it.
    pub(super) fn parse(redirect_uri: &str) -> Result<Self, AdapterError> {
        let url = Url::parse(redirect_uri)?;
        if url.scheme() != "http" {
            return Err(AdapterError::InvalidRedirectUri(
                "redirect uri must use http scheme".to_string(),
            ));
        }

        let host = url.host_str().ok_or_else(|| {
            AdapterError::InvalidRedirectUri("redirect uri is missing host".to_string())
        })?;

        let port = url.port_or_known_default().ok_or_else(|| {
            AdapterError::InvalidRedirectUri("redirect uri is missing port".to_string())
        })?;

        Ok(Self {
            host: host.to_string(),
            port,
            path: url.path().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RedirectTarget;
    use crate::AdapterError;

    #[test]
    fn parses_default_redirect_uri() {
        let target = RedirectTarget::parse("http://localhost:3000").unwrap();
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 3000);
        assert_eq!(target.path, "/");
    }

    #[test]
    fn parses_redirect_path() {
        let target = RedirectTarget::parse("http://127.0.0.1:8080/auth/twitch").unwrap();
        assert_eq!(target.host, "127.0.0.1");
        assert_eq!(target.port, 8080);
        assert_eq!(target.path, "/auth/twitch");
    }

    #[test]
    fn rejects_https_redirect() {
        let result = RedirectTarget::parse("https://example.com/callback");
        assert!(matches!(result, Err(AdapterError::InvalidRedirectUri(_))));
    }
}
