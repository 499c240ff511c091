//! Configuration for the Delivery API client.
//!
//! Configuration is an immutable value handed to the client at construction
//! time. Scope selection (space- vs environment-scoped endpoints) happens per
//! request via [`ApiScope`], never by mutating shared client state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::{DEFAULT_ENVIRONMENT, DEFAULT_HOST};

/// URL scope for a Delivery API request.
///
/// Space metadata lives directly under the space; content (entries, assets,
/// content types, locales, sync) lives under a named environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScope {
    Space,
    Environment,
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Space identifier
    pub space: String,
    /// Delivery API access token (Bearer)
    pub access_token: String,
    /// Environment identifier
    pub environment: String,
    /// API host, without scheme
    pub host: String,
    /// Use HTTPS (plain HTTP is only useful against local fixtures)
    pub secure: bool,
    /// Resolve links in responses
    pub resolve_links: bool,
    /// Remove markers whose target is not part of the response
    pub remove_unresolved: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Enable debug logging of retries
    pub debug: bool,
}

impl ClientConfig {
    /// Create a configuration for the given space and access token, with
    /// defaults for everything else.
    pub fn new(space: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Target a non-default environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Target a non-default host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the link-resolution policy.
    pub fn with_resolve_links(mut self, resolve_links: bool) -> Self {
        self.resolve_links = resolve_links;
        self
    }

    /// Set the unresolved-marker removal policy.
    pub fn with_remove_unresolved(mut self, remove_unresolved: bool) -> Self {
        self.remove_unresolved = remove_unresolved;
        self
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the host, space, or access token is
    /// empty. Called synchronously before any request is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.space.trim().is_empty() {
            return Err(Error::Config("space must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("access token must not be empty".to_string()));
        }
        if self.environment.trim().is_empty() {
            return Err(Error::Config("environment must not be empty".to_string()));
        }
        Ok(())
    }

    /// Compose the base URL for the given scope.
    pub fn base_url(&self, scope: ApiScope) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        match scope {
            ApiScope::Space => format!("{}://{}/spaces/{}", scheme, self.host, self.space),
            ApiScope::Environment => format!(
                "{}://{}/spaces/{}/environments/{}",
                scheme, self.host, self.space, self.environment
            ),
        }
    }

    /// Compose a full endpoint URL for the given scope. An empty path
    /// addresses the scope root itself.
    pub fn endpoint_url(&self, scope: ApiScope, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return self.base_url(scope);
        }
        format!("{}/{}", self.base_url(scope), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            space: String::new(),
            access_token: String::new(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            host: DEFAULT_HOST.to_string(),
            secure: true,
            resolve_links: true,
            remove_unresolved: false,
            timeout_secs: 30,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ClientConfig::default();

        assert_eq!(config.environment, "master");
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.secure);
        assert!(config.resolve_links);
        assert!(!config.remove_unresolved);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.debug);
    }

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::new("my-space", "token-123");
        assert!(config.validate().is_ok());

        let missing_space = ClientConfig::new("", "token-123");
        assert!(matches!(
            missing_space.validate().unwrap_err(),
            Error::Config(_)
        ));

        let missing_token = ClientConfig::new("my-space", "");
        assert!(matches!(
            missing_token.validate().unwrap_err(),
            Error::Config(_)
        ));

        let missing_host = ClientConfig::new("my-space", "token-123").with_host("");
        assert!(matches!(
            missing_host.validate().unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_base_url_scopes() {
        let config = ClientConfig::new("my-space", "token-123").with_environment("staging");

        assert_eq!(
            config.base_url(ApiScope::Space),
            format!("https://{}/spaces/my-space", DEFAULT_HOST)
        );
        assert_eq!(
            config.base_url(ApiScope::Environment),
            format!("https://{}/spaces/my-space/environments/staging", DEFAULT_HOST)
        );
    }

    #[test]
    fn test_endpoint_url() {
        let config = ClientConfig::new("s1", "t1");

        assert_eq!(
            config.endpoint_url(ApiScope::Environment, "entries"),
            format!("https://{}/spaces/s1/environments/master/entries", DEFAULT_HOST)
        );
        // Leading slash is tolerated
        assert_eq!(
            config.endpoint_url(ApiScope::Environment, "/assets/a1"),
            format!("https://{}/spaces/s1/environments/master/assets/a1", DEFAULT_HOST)
        );
    }

    #[test]
    fn test_insecure_scheme() {
        let mut config = ClientConfig::new("s1", "t1").with_host("localhost:9000");
        config.secure = false;

        assert_eq!(
            config.base_url(ApiScope::Space),
            "http://localhost:9000/spaces/s1"
        );
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = ClientConfig::new("s1", "t1")
            .with_environment("staging")
            .with_remove_unresolved(true);

        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.space, "s1");
        assert_eq!(back.environment, "staging");
        assert!(back.remove_unresolved);
    }
}
