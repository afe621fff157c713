use clap::{Parser, ValueEnum};

/// Structured output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Command-line interface definition.
///
/// Verbosity levels:
/// 0 - silent (only final output)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 3 - info
/// 5 - trace/debug (includes parser / resolver diagnostics)
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Fetch and parse security.txt documents and find vulnerability reporting addresses"
)]
pub struct Cli {
    /// Hostnames to look up, or file paths when --files is given.
    #[arg(required_unless_present = "generate_schema", num_args = 1..)]
    pub targets: Vec<String>,

    /// Treat targets as local security.txt files instead of hostnames
    #[arg(short = 'f', long)]
    pub files: bool,

    /// Resolve reporting email addresses (falls back to security@<host>)
    #[arg(short = 'c', long, conflicts_with = "files")]
    pub contacts: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Verbosity level (0,1,2,3,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum number of hosts resolved concurrently
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Omit tool metadata from the output
    #[arg(long)]
    pub no_metadata: bool,

    /// Print the JSON schema of the output and exit
    #[arg(long)]
    pub generate_schema: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }

    /// `tracing` filter directive for the selected verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 | 4 => "info",
            _ => "debug",
        }
    }
}
