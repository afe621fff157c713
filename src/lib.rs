//! sectxt Library
//!
//! Retrieve and parse `security.txt` (RFC 9116) documents and derive the
//! email addresses to use for vulnerability reports. This library provides
//! functionality to:
//!
//! - Parse raw document bytes into a field map (case-insensitive keys,
//!   repeated fields collected into lists)
//! - Fetch `https://<host>/.well-known/security.txt` or load local files
//! - Resolve `mailto:` contacts, falling back to `security@<host>` (RFC 2142)
//! - Render results as JSON or YAML
//!
//! # Example
//!
//! ```rust,no_run
//! use sectxt::config::NetworkConfig;
//! use sectxt::diagnostics::TracingSink;
//! use sectxt::resolver::resolve_contacts;
//! use sectxt::sources::HttpSource;
//!
//! # async fn run() -> sectxt::Result<()> {
//! let source = HttpSource::new(&NetworkConfig::default())?;
//! let resolved = resolve_contacts("example.com", &source, &TracingSink).await;
//! for address in resolved.addresses() {
//!     println!("{address}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod logging;
pub mod parser;
pub mod resolver;
pub mod sources;
pub mod structured_output;

// Re-export commonly used types and functions for convenience
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use errors::{Result, SecTxtError};
pub use parser::{FieldMap, FieldValue, parse};
pub use resolver::{ContactOrigin, ResolvedContacts, resolve_contacts};
pub use sources::{DocumentSource, HttpSource, RawDocument, StaticSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
