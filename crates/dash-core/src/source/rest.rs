// File: crates/dash-core/src/source/rest.rs
// Summary: REST data source (`{base}/rest/v1/{table}?..`) authenticated with an injected key.

use async_trait::async_trait;
use reqwest::Url;

use crate::config::SourceConfig;
use crate::error::{ConfigError, FetchError};
use crate::source::{DataSource, Query};
use crate::types::RawRow;

#[derive(Clone, Debug)]
pub struct RestSource {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl RestSource {
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &SourceConfig, http: reqwest::Client) -> Result<Self, ConfigError> {
        config.validate()?;
        let raw = format!("{}/rest/v1/", config.base_url.trim_end_matches('/'));
        let base = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl { url: raw.clone(), reason: e.to_string() })?;
        Ok(Self { http, base, api_key: config.api_key.clone() })
    }

    /// Fully encoded request URL for `query`.
    pub fn url_for(&self, query: &Query) -> Result<Url, FetchError> {
        let mut url = self.base.join(&query.table).map_err(|e| FetchError::InvalidQuery {
            query: query.to_string(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query.pairs() {
                pairs.append_pair(&k, &v);
            }
        }
        Ok(url)
    }
}

#[async_trait(?Send)]
impl DataSource for RestSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<RawRow>, FetchError> {
        let url = self.url_for(query)?;
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), body });
        }
        Ok(resp.json::<Vec<RawRow>>().await?)
    }
}
