use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::error::AppError;
use tracing::debug;
use url::Url;

/// Retrieves the raw index document. Implementations perform exactly one
/// attempt per call; retry policy belongs to the caller.
#[async_trait]
pub trait IndexFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Bytes, AppError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| AppError::InternalError(format!("building http client: {err}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl IndexFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, AppError> {
        debug!(%url, "fetching index document");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| transport_error(url, &err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(url, &err))?;
        debug!(%url, bytes = body.len(), "index document received");
        Ok(body)
    }
}

fn transport_error(url: &Url, err: &reqwest::Error) -> AppError {
    let reason = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };

    AppError::Transport {
        url: url.to_string(),
        status: err.status().map(|status| status.as_u16()),
        reason,
    }
}
