//! CLI-facing application layer.
//!
//! Major steps in `App::run`:
//!   1. Schema generation early-exit
//!   2. Config load (env, then CLI) and validation
//!   3. Logging setup
//!   4. Target interpretation (files or hostnames)
//!   5. Parsing / contact resolution
//!   6. Structured output (JSON/YAML) on stdout

use std::sync::Arc;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::errors::Result;
use crate::logging;
use crate::parser::parse_document;
use crate::resolver::{fetch_many, resolve_many};
use crate::sources::{DocumentSource, HttpSource, load_file, validate_hostname};
use crate::structured_output::{DocumentSourceKind, SecTxtOutput};

/// Application façade.
pub struct App;

impl App {
    /// Execute the workflow selected on the command line.
    ///
    /// Returns: intended process exit code on success. Rejected input
    /// (configuration, hostnames) and unreadable files come back as errors;
    /// `SecTxtError::exit_code` turns them into the process status.
    pub async fn run(cli: &Cli) -> Result<i32> {
        if cli.generate_schema {
            println!("{}", SecTxtOutput::generate_json_schema()?);
            return Ok(0);
        }

        let mut config = Config::from_env();
        config.merge_with_cli(cli);
        config.validate()?;

        if let Err(e) = logging::initialize_logging(cli.log_directive()) {
            // A subscriber may already be installed when embedded; keep going.
            if cli.is_trace() {
                eprintln!("[trace] {e}");
            }
        }

        let report = if cli.files {
            Self::parse_files(cli, &config).await?
        } else {
            for hostname in &cli.targets {
                validate_hostname(hostname)?;
            }
            let source: Arc<dyn DocumentSource> = Arc::new(HttpSource::new(&config.network)?);
            let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
            tracing::info!(
                hosts = cli.targets.len(),
                source = source.name(),
                "looking up security.txt"
            );
            if cli.contacts {
                Self::resolve_hosts(cli, &config, source, sink).await?
            } else {
                Self::fetch_hosts(cli, &config, source, sink).await?
            }
        };

        let rendered = match config.output.format {
            OutputFormat::Json => report.to_json()?,
            OutputFormat::Yaml => report.to_yaml()?,
        };
        println!("{rendered}");
        Ok(0)
    }

    /// Files mode: read errors are fatal, undecodable content is `null`.
    async fn parse_files(cli: &Cli, config: &Config) -> Result<SecTxtOutput> {
        let sink = TracingSink;
        let mut report = SecTxtOutput::new(config.output.include_metadata);
        for path in &cli.targets {
            let document = load_file(path).await?;
            let fields = parse_document(&document, &sink);
            report.push_document(path.clone(), DocumentSourceKind::from(document.origin()), fields);
        }
        Ok(report)
    }

    /// Hostname mode: the parsed field map of every host.
    async fn fetch_hosts(
        cli: &Cli,
        config: &Config,
        source: Arc<dyn DocumentSource>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<SecTxtOutput> {
        let mut report = SecTxtOutput::new(config.output.include_metadata);
        let fetched = fetch_many(
            &cli.targets,
            source,
            sink,
            config.network.max_concurrent_lookups,
        )
        .await?;
        for (hostname, fields) in cli.targets.iter().zip(fetched) {
            report.push_document(hostname.clone(), DocumentSourceKind::Network, fields);
        }
        Ok(report)
    }

    /// Contacts mode: reporting addresses for every host.
    async fn resolve_hosts(
        cli: &Cli,
        config: &Config,
        source: Arc<dyn DocumentSource>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<SecTxtOutput> {
        let mut report = SecTxtOutput::new(config.output.include_metadata);
        report.contacts = resolve_many(
            &cli.targets,
            source,
            sink,
            config.network.max_concurrent_lookups,
        )
        .await?;
        Ok(report)
    }
}
