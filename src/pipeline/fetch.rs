//! Paste retrieval over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{optional_timeout, PasteFetcher};
use crate::config::FetchConfig;
use crate::error::FetchError;

/// Raw-text URL for a paste: trailing slashes dropped, suffix appended.
pub fn raw_url(url: &str, suffix: &str) -> String {
    format!("{}{}", url.trim_end_matches('/'), suffix)
}

/// Fetches `<paste>/raw/` with a single GET. Only status 200 counts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    raw_suffix: String,
}

impl HttpFetcher {
    pub fn new(
        raw_suffix: impl Into<String>,
        timeout: Option<Duration>,
        accept_invalid_certs: bool,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lintbot/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(accept_invalid_certs);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            raw_suffix: raw_suffix.into(),
        })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.raw_suffix.clone(),
            optional_timeout(config.timeout_secs),
            config.accept_invalid_certs,
        )
    }
}

#[async_trait]
impl PasteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let raw = raw_url(url, &self.raw_suffix);
        debug!(url = %raw, "fetching paste");

        let response = self
            .client
            .get(&raw)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: raw.clone(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: raw,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request { url: raw, source })?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_url() {
        assert_eq!(
            raw_url("https://dpaste.de/abc", "/raw/"),
            "https://dpaste.de/abc/raw/"
        );
        assert_eq!(
            raw_url("https://dpaste.de/abc/", "/raw/"),
            "https://dpaste.de/abc/raw/"
        );
    }
}
