//! Reporting-contact resolution.
//!
//! Given a hostname and a [`DocumentSource`], fetch the host's
//! `security.txt`, parse it and collect the addresses of every `mailto:`
//! `Contact` entry in document order. Duplicates are kept. When nothing
//! usable comes out (no document, undecodable body, no `contact` field, no
//! `mailto:` entries) the result is the single RFC 2142 address
//! `security@<hostname>`.
//!
//! Every path through [`resolve_contacts`] produces a result; failures are
//! only visible through the diagnostics sink.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{Result, SecTxtError};
use crate::parser::{FieldMap, parse_document};
use crate::sources::DocumentSource;

/// Local part of the RFC 2142 fallback mailbox.
pub const FALLBACK_LOCAL_PART: &str = "security";

/// Field holding the contact URIs.
pub const CONTACT_FIELD: &str = "contact";

/// How the addresses of a [`ResolvedContacts`] were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactOrigin {
    /// `mailto:` contacts published in the host's security.txt
    SecurityTxt,
    /// Synthesized `security@<hostname>`
    Rfc2142Fallback,
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedContacts {
    /// Host the lookup was made for
    pub hostname: String,

    /// Reporting addresses, in document order (never empty)
    pub addresses: Vec<String>,

    /// Where the addresses came from
    pub origin: ContactOrigin,
}

impl ResolvedContacts {
    pub fn is_fallback(&self) -> bool {
        self.origin == ContactOrigin::Rfc2142Fallback
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn into_addresses(self) -> Vec<String> {
        self.addresses
    }
}

/// `security@<hostname>`
pub fn fallback_address(hostname: &str) -> String {
    format!("{FALLBACK_LOCAL_PART}@{hostname}")
}

/// Fetch and parse the document for `hostname`.
///
/// `None` when the source has no document or the body is not UTF-8.
pub async fn fetch_security_txt(
    hostname: &str,
    source: &dyn DocumentSource,
    sink: &dyn DiagnosticSink,
) -> Option<FieldMap> {
    let document = source.fetch(hostname, sink).await?;
    parse_document(&document, sink)
}

/// Addresses of the `mailto:` entries of the `contact` field.
///
/// Entries that do not parse as a URI, or whose scheme is anything but
/// `mailto`, are ignored. The address is the entry text between the scheme
/// and the first `?` or `#`, exactly as written in the document (no
/// percent-encoding); a query or fragment is not inspected.
pub fn extract_mailto_addresses(fields: &FieldMap, sink: &dyn DiagnosticSink) -> Vec<String> {
    let Some(contacts) = fields.get(CONTACT_FIELD) else {
        return Vec::new();
    };

    let mut addresses = Vec::new();
    for entry in contacts.as_slice() {
        let Ok(uri) = Url::parse(entry) else {
            continue;
        };
        if uri.scheme() != "mailto" {
            continue;
        }
        // TODO: decide whether hfields (?subject=...) or a fragment should disqualify the entry.
        if uri.query().is_some() || uri.fragment().is_some() {
            sink.record(Diagnostic::MailtoComponentsIgnored {
                entry: entry.clone(),
            });
        }
        addresses.push(mailto_path(entry).to_string());
    }
    addresses
}

/// Raw path of a `mailto:` URI: after the first `:`, before any `?` or `#`.
fn mailto_path(entry: &str) -> &str {
    let rest = entry.split_once(':').map_or("", |(_, rest)| rest);
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Resolve the reporting addresses for one host.
pub async fn resolve_contacts(
    hostname: &str,
    source: &dyn DocumentSource,
    sink: &dyn DiagnosticSink,
) -> ResolvedContacts {
    let addresses = match fetch_security_txt(hostname, source, sink).await {
        Some(fields) => extract_mailto_addresses(&fields, sink),
        None => Vec::new(),
    };

    if addresses.is_empty() {
        let address = fallback_address(hostname);
        sink.record(Diagnostic::FallbackUsed {
            hostname: hostname.to_string(),
            address: address.clone(),
        });
        return ResolvedContacts {
            hostname: hostname.to_string(),
            addresses: vec![address],
            origin: ContactOrigin::Rfc2142Fallback,
        };
    }

    sink.record(Diagnostic::ContactsFound {
        hostname: hostname.to_string(),
        count: addresses.len(),
    });
    ResolvedContacts {
        hostname: hostname.to_string(),
        addresses,
        origin: ContactOrigin::SecurityTxt,
    }
}

/// Resolve several hosts concurrently, at most `max_concurrent` at a time.
///
/// Results are returned in input order. Resolutions share nothing but the
/// source and the sink.
pub async fn resolve_many(
    hostnames: &[String],
    source: Arc<dyn DocumentSource>,
    sink: Arc<dyn DiagnosticSink>,
    max_concurrent: usize,
) -> Result<Vec<ResolvedContacts>> {
    run_bounded(hostnames, max_concurrent, move |hostname| {
        let source = Arc::clone(&source);
        let sink = Arc::clone(&sink);
        async move { resolve_contacts(&hostname, source.as_ref(), sink.as_ref()).await }
    })
    .await
}

/// Fetch and parse several hosts concurrently; one entry per host, in input order.
pub async fn fetch_many(
    hostnames: &[String],
    source: Arc<dyn DocumentSource>,
    sink: Arc<dyn DiagnosticSink>,
    max_concurrent: usize,
) -> Result<Vec<Option<FieldMap>>> {
    run_bounded(hostnames, max_concurrent, move |hostname| {
        let source = Arc::clone(&source);
        let sink = Arc::clone(&sink);
        async move { fetch_security_txt(&hostname, source.as_ref(), sink.as_ref()).await }
    })
    .await
}

/// Run `job` for every hostname on tokio tasks, at most `max_concurrent` at once,
/// collecting outputs in input order. Only a panicked task is an error.
async fn run_bounded<T, F, Fut>(
    hostnames: &[String],
    max_concurrent: usize,
    job: F,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let limit = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for (idx, hostname) in hostnames.iter().cloned().enumerate() {
        let limit = Arc::clone(&limit);
        let work = job(hostname);
        tasks.spawn(async move {
            let _permit = limit
                .acquire_owned()
                .await
                .map_err(|e| SecTxtError::internal_with("lookup limiter closed", e))?;
            Ok::<_, SecTxtError>((idx, work.await))
        });
    }

    let mut slots: Vec<Option<T>> = (0..hostnames.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (idx, output) =
            joined.map_err(|e| SecTxtError::internal_with("lookup task failed", e))??;
        slots[idx] = Some(output);
    }
    Ok(slots.into_iter().flatten().collect())
}
