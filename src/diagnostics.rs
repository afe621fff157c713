//! Observational diagnostics emitted while parsing and resolving.
//!
//! Nothing recorded here influences a result; the sink only lets a caller
//! see why a lookup ended the way it did (skipped lines, failed fetches,
//! fallback usage). The CLI forwards everything to `tracing`, tests collect
//! into a buffer, and embedding callers can discard it entirely.

use std::fmt;
use std::sync::Mutex;

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The document body was not valid UTF-8.
    DecodeFailure { valid_up_to: usize },
    /// A non-comment, non-blank line without a `key:value` delimiter.
    MalformedLine { line: String },
    /// No document could be retrieved for the host.
    FetchFailed { hostname: String, reason: String },
    /// A `mailto:` contact carried a query or fragment that was passed through untouched.
    MailtoComponentsIgnored { entry: String },
    /// The document yielded at least one reporting address.
    ContactsFound { hostname: String, count: usize },
    /// No usable contact; the RFC 2142 address was synthesized.
    FallbackUsed { hostname: String, address: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DecodeFailure { valid_up_to } => {
                write!(f, "document is not valid UTF-8 (valid up to byte {valid_up_to})")
            }
            Diagnostic::MalformedLine { line } => write!(f, "cannot decode line {line:?}"),
            Diagnostic::FetchFailed { hostname, reason } => {
                write!(f, "no security.txt for {hostname}: {reason}")
            }
            Diagnostic::MailtoComponentsIgnored { entry } => {
                write!(f, "mailto contact has query/fragment components: {entry}")
            }
            Diagnostic::ContactsFound { hostname, count } => {
                write!(f, "security.txt mail contact(s) found for {hostname} ({count})")
            }
            Diagnostic::FallbackUsed { hostname, address } => write!(
                f,
                "no security.txt mail contact for {hostname}, use RFC 2142 ({address})"
            ),
        }
    }
}

/// Receiver for diagnostics. Must be shareable across concurrent resolutions.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        tracing::debug!("{diagnostic}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _diagnostic: Diagnostic) {}
}

/// Buffers diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(mut entries) => std::mem::take(&mut *entries),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_buffers_in_order() {
        let sink = CollectingSink::new();
        sink.record(Diagnostic::MalformedLine {
            line: "garbage".into(),
        });
        sink.record(Diagnostic::DecodeFailure { valid_up_to: 3 });
        let got = sink.take();
        assert_eq!(got.len(), 2);
        assert!(matches!(got[0], Diagnostic::MalformedLine { .. }));
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn fallback_message_mentions_rfc() {
        let d = Diagnostic::FallbackUsed {
            hostname: "example.com".into(),
            address: "security@example.com".into(),
        };
        let s = d.to_string();
        assert!(s.contains("RFC 2142"));
        assert!(s.contains("security@example.com"));
    }
}
