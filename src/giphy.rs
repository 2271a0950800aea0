use crate::{
    config::{Config, ConfigError},
    domain::{FetchMode, GifSource, SearchQuery},
    errors::FetchError,
    models::{GifResultSet, GiphyEnvelope},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;

/// Results requested per call.
pub const PAGE_SIZE: u32 = 25;
/// Content rating filter ("general audiences").
pub const CONTENT_RATING: &str = "g";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Queries the Giphy search and trending endpoints.
#[derive(Clone)]
pub struct GiphyClient {
    client: reqwest::Client,
    api_key: String,
    search_url: Url,
    trending_url: Url,
}

impl GiphyClient {
    /// `base_url` is the API root, e.g. `https://api.giphy.com`.
    pub fn new(client: reqwest::Client, base_url: &Url, api_key: String) -> Result<Self, ConfigError> {
        // Without a trailing slash `join` would replace the last path segment.
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let endpoint = |path: &str| {
            base.join(path)
                .map_err(|e| ConfigError::InvalidVar("GIPHY_BASE_URL".into(), e.to_string()))
        };

        Ok(Self {
            client,
            api_key,
            search_url: endpoint("v1/gifs/search")?,
            trending_url: endpoint("v1/gifs/trending")?,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Unable to create the Reqwest client")?;

        tracing::info!(base_url = %config.giphy_base_url, "Initializing Giphy client");
        Ok(Self::new(client, &config.giphy_base_url, config.giphy_api_key.clone())?)
    }

    /// Full request URL for `query`, parameters URL-encoded.
    pub fn endpoint_url(&self, query: &SearchQuery) -> Url {
        let mut url = match query.mode() {
            FetchMode::Search(_) => self.search_url.clone(),
            FetchMode::Trending => self.trending_url.clone(),
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            if let FetchMode::Search(term) = query.mode() {
                pairs.append_pair("q", term);
            }
            pairs
                .append_pair("limit", &PAGE_SIZE.to_string())
                .append_pair("rating", CONTENT_RATING);
        }

        url
    }
}

#[async_trait]
impl GifSource for GiphyClient {
    /// Sends one GET and decodes the `data` array of the envelope.
    async fn fetch(&self, query: &SearchQuery) -> Result<GifResultSet, FetchError> {
        let mode = query.mode();
        // The URL carries the API key, so only the mode and term are logged.
        tracing::debug!(mode = mode.name(), term = ?query.term(), "Giphy: Fetching GIFs");

        let response = self
            .client
            .get(self.endpoint_url(query))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;
        let envelope: GiphyEnvelope = serde_json::from_slice(&body).map_err(FetchError::Decode)?;

        tracing::debug!(mode = mode.name(), count = envelope.data.len(), "Giphy: Fetch successful");
        Ok(envelope.data)
    }
}
