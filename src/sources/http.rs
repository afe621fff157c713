//! HTTPS retrieval of `/.well-known/security.txt`.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::redirect::Policy;

use crate::config::NetworkConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{Result, SecTxtError};

use super::{DocumentSource, RawDocument, well_known_url};

/// Fetches documents over HTTPS with a bounded timeout and redirect budget.
///
/// The underlying client is stateless apart from its connection pool, so one
/// instance can serve concurrent resolutions.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    max_document_bytes: usize,
}

impl HttpSource {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SecTxtError::internal_with("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            max_document_bytes: config.max_document_bytes,
        })
    }

    /// Single GET of the well-known URL. Non-success statuses and bodies over
    /// the size limit are errors. The body is read chunk by chunk and
    /// abandoned as soon as it outgrows the limit.
    pub async fn try_fetch(&self, hostname: &str) -> Result<RawDocument> {
        let url = well_known_url(hostname);
        tracing::debug!(%url, "fetching security.txt");

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SecTxtError::network("GET", &url, e))?;

        check_status(&url, response.status())?;
        check_declared_length(&url, response.content_length(), self.max_document_bytes)?;

        let mut body = LimitedBody::new(url, self.max_document_bytes);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SecTxtError::network("read body", body.url(), e))?
        {
            body.push(&chunk)?;
        }
        Ok(body.into_document())
    }
}

/// Anything but 2xx is a failed fetch.
fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SecTxtError::http_status(url, status.as_u16()))
    }
}

/// Reject early when the server announces an oversized body.
fn check_declared_length(url: &str, content_length: Option<u64>, limit: usize) -> Result<()> {
    match content_length {
        Some(len) if len > limit as u64 => Err(SecTxtError::document_too_large(url, limit)),
        _ => Ok(()),
    }
}

/// Response body accumulated under a byte limit.
#[derive(Debug)]
struct LimitedBody {
    url: String,
    limit: usize,
    bytes: Vec<u8>,
}

impl LimitedBody {
    fn new(url: String, limit: usize) -> Self {
        Self {
            url,
            limit,
            bytes: Vec::new(),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn push(&mut self, chunk: &[u8]) -> Result<()> {
        if self.bytes.len() + chunk.len() > self.limit {
            return Err(SecTxtError::document_too_large(&self.url, self.limit));
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    fn into_document(self) -> RawDocument {
        RawDocument::from_network(self.url, self.bytes)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn name(&self) -> &'static str {
        "https"
    }

    async fn fetch(&self, hostname: &str, sink: &dyn DiagnosticSink) -> Option<RawDocument> {
        match self.try_fetch(hostname).await {
            Ok(document) => Some(document),
            Err(e) => {
                sink.record(Diagnostic::FetchFailed {
                    hostname: hostname.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}
