use std::time::Duration;

use url::Url;

use crate::error::{ClaimDeskError, Result};

/// Claims shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Configuration for the claim desk client.
#[derive(Debug, Clone)]
pub struct ClaimDeskConfig {
    /// Base URL of the admin API (e.g. `https://api.example.com/admin`).
    pub api_url: String,
    /// Bearer token forwarded on every request, if any.
    pub api_token: Option<String>,
    /// Claims requested per page.
    pub page_size: usize,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
}

impl Default for ClaimDeskConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClaimDeskConfig {
    /// Build a config for `api_url` with defaults for everything else.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Check the config before handing it to a client.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClaimDeskError::Config(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(ClaimDeskError::Config("page size must be non-zero".into()));
        }
        if self.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ClaimDeskError::Config("API token is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        assert_eq!(ClaimDeskConfig::default().page_size, 5);
    }

    #[test]
    fn test_validate_accepts_https() {
        let config = ClaimDeskConfig::new("https://admin.example.com/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = ClaimDeskConfig::new("ftp://admin.example.com");
        assert!(matches!(config.validate(), Err(ClaimDeskError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_garbage_url() {
        let config = ClaimDeskConfig::new("not a url");
        assert!(matches!(config.validate(), Err(ClaimDeskError::Url(_))));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = ClaimDeskConfig {
            page_size: 0,
            ..ClaimDeskConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let config = ClaimDeskConfig {
            api_token: Some("  ".into()),
            ..ClaimDeskConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
