pub mod endpoints;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClaimDeskConfig;
use crate::error::{ClaimDeskError, Result};

/// HTTP client wrapper for the claim admin REST API.
#[derive(Debug, Clone)]
pub struct ClaimDeskHttpClient {
    client: Client,
    base_url: String,
}

impl ClaimDeskHttpClient {
    /// Client without auth or timeout, for local and test servers.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from a validated config.
    pub fn from_config(config: &ClaimDeskConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClaimDeskError::Config("API token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON resource at a path built from raw segments.
    ///
    /// Each segment is percent-encoded on its own, so ids may hold `/`, `+`
    /// or spaces.
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ClaimDeskError::Config(format!("{} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let resp = Self::check_status(resp).await?;
        resp.json::<T>().await.map_err(ClaimDeskError::Request)
    }

    /// POST a JSON body and return the raw response text.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        let resp = Self::check_status(resp).await?;
        resp.text().await.map_err(ClaimDeskError::Request)
    }

    async fn check_status(resp: Response) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ClaimDeskError::Http {
            status,
            message: body,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
