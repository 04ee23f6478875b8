//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::orchestrator::DEFAULT_DELAY_MS;

/// savecfg -- snapshot Sumo Logic configuration objects.
///
/// Without `--list`, runs the selected query (or every registered query)
/// and writes one artifact per query to the cache directory.
#[derive(Parser, Debug)]
#[command(name = "savecfg", version, about, long_about = None)]
pub struct Cli {
    /// Credential pair as `<access_id>:<access_key>`.
    #[arg(short = 'a', long, value_name = "ID:KEY")]
    pub secret: Option<String>,

    /// INI file with a `[Default]` section (SUMO_UID, SUMO_KEY, SUMO_URL, SUMO_ENDPOINT).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Query to run, or `all`.
    #[arg(short, long, default_value = "all", value_name = "NAME")]
    pub query: String,

    /// List registered queries and exit.
    #[arg(short, long)]
    pub list: bool,

    /// HTTP source URL to republish artifacts to.
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// API endpoint: a short region code (`us`, `au`) or a full base URL.
    #[arg(short, long, value_name = "CODE|URL")]
    pub endpoint: Option<String>,

    /// Verbosity level (0: warnings only, 5: debug, 9: trace).
    #[arg(short, long, default_value_t = 0, value_name = "LEVEL")]
    pub verbose: u8,

    /// Alternate query manifest (JSON object of name to API path).
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Artifact directory (default: <tmp>/sumologic/config).
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Pause between consecutive queries, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DELAY_MS, value_name = "MS")]
    pub delay_ms: u64,

    /// Log line format (logs go to stderr).
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Supported log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// One JSON object per line.
    Json,
}
