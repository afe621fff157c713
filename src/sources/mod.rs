//! Byte sources for `security.txt` documents.
//!
//! The resolver never talks to the network or the filesystem itself; it
//! asks a [`DocumentSource`] for the raw bytes published by a host. Every
//! source implements a uniform async trait so the caller can swap the real
//! HTTP client for pre-loaded documents (offline operation, tests).
//!
//! Sources fold their own failures into `None`: a transport error, a
//! non-success status or an oversized body all mean "no document" to the
//! resolver. The reason is reported to the diagnostics sink.
//!
//! Public items:
//!   - `DocumentSource` trait
//!   - `RawDocument`, `DocumentOrigin`
//!   - `HttpSource` (HTTPS well-known path)
//!   - `StaticSource` (in-memory hostname -> bytes)
//!   - `load_file` (file-load capability, no hostname involved)

mod file;
mod http;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{Result, SecTxtError};

pub use file::load_file;
pub use http::HttpSource;

/// Location of the document relative to a host.
pub const WELL_KNOWN_PATH: &str = "/.well-known/security.txt";

/// Where a raw document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    Network { url: String },
    File { path: PathBuf },
}

/// Unparsed document bytes, tagged with their origin.
#[derive(Debug, Clone)]
pub struct RawDocument {
    origin: DocumentOrigin,
    bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(origin: DocumentOrigin, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            bytes: bytes.into(),
        }
    }

    pub fn from_network(url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(DocumentOrigin::Network { url: url.into() }, bytes)
    }

    pub fn from_file(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(DocumentOrigin::File { path: path.into() }, bytes)
    }

    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Anything that can produce the `security.txt` bytes published by a host.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw document for `hostname`, or `None` when nothing usable could be retrieved.
    /// Implementations must not retry.
    async fn fetch(&self, hostname: &str, sink: &dyn DiagnosticSink) -> Option<RawDocument>;
}

/// `https://<hostname>/.well-known/security.txt`
pub fn well_known_url(hostname: &str) -> String {
    format!("https://{hostname}{WELL_KNOWN_PATH}")
}

/// Check that `hostname` (optionally with `:port`, IDN or bracketed IPv6)
/// forms a well-known URL with nothing else smuggled in. Used for CLI input
/// only; the resolver itself accepts whatever it is given.
pub fn validate_hostname(hostname: &str) -> Result<()> {
    let Ok(url) = Url::parse(&well_known_url(hostname)) else {
        return Err(SecTxtError::invalid_hostname(hostname));
    };
    let only_host = url.host().is_some()
        && url.username().is_empty()
        && url.password().is_none()
        && url.path() == WELL_KNOWN_PATH
        && url.query().is_none()
        && url.fragment().is_none();
    if only_host {
        Ok(())
    } else {
        Err(SecTxtError::invalid_hostname(hostname))
    }
}

/// Pre-loaded documents keyed by hostname.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    documents: HashMap<String, Vec<u8>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_document(mut self, hostname: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(hostname, bytes);
        self
    }

    pub fn insert(&mut self, hostname: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.documents.insert(hostname.into(), bytes.into());
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, hostname: &str, sink: &dyn DiagnosticSink) -> Option<RawDocument> {
        match self.documents.get(hostname) {
            Some(bytes) => Some(RawDocument::from_network(
                well_known_url(hostname),
                bytes.clone(),
            )),
            None => {
                sink.record(Diagnostic::FetchFailed {
                    hostname: hostname.to_string(),
                    reason: "no pre-loaded document".into(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    #[test]
    fn builds_well_known_url() {
        assert_eq!(
            well_known_url("example.com"),
            "https://example.com/.well-known/security.txt"
        );
        assert_eq!(
            well_known_url("example.com:8443"),
            "https://example.com:8443/.well-known/security.txt"
        );
    }

    #[test]
    fn hostname_validation() {
        assert!(validate_hostname("example.com").is_ok());
        assert!(validate_hostname("sub.example.co.uk").is_ok());
        assert!(validate_hostname("localhost:8443").is_ok());
        assert!(validate_hostname("bücher.de").is_ok());
        assert!(validate_hostname("[::1]").is_ok());
        assert!(validate_hostname("192.0.2.7").is_ok());
        assert!(validate_hostname("example.com/evil").is_err());
        assert!(validate_hostname("user@example.com").is_err());
        assert!(validate_hostname("example.com?x=1").is_err());
        assert!(validate_hostname("exa mple.com").is_err());
        assert!(validate_hostname("").is_err());
    }

    #[tokio::test]
    async fn static_source_hit_and_miss() {
        let source = StaticSource::new().with_document("example.com", "Contact: mailto:a@b.c");
        let sink = CollectingSink::new();

        let doc = source.fetch("example.com", &sink).await.unwrap();
        assert_eq!(doc.bytes(), b"Contact: mailto:a@b.c");
        assert!(matches!(doc.origin(), DocumentOrigin::Network { url } if url.ends_with(WELL_KNOWN_PATH)));

        assert!(source.fetch("other.test", &sink).await.is_none());
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::FetchFailed { hostname, .. }] if hostname == "other.test"
        ));
    }
}
