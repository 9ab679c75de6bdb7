//! # Commands
//!
//! - `ferret scan` - Scan hosted or directly named repositories over git history
//! - `ferret local` - Scan a local directory tree
//! - `ferret signatures` - List the loaded detection signatures

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod git;
mod orchestrator;
mod output;
mod ui;
mod walker;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
use ferret_core::OutputMode;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/ferret-scanner/ferret";

#[derive(Debug, Parser)]
#[command(
    name = "ferret",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "l")]
    Local(LocalArgs),

    Signatures(SignaturesArgs),
}

/// Hosting service used to enumerate targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Host {
    /// github.com.
    #[default]
    Github,
    /// gitlab.com.
    Gitlab,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON.
    Json,
    /// CSV rows with a header.
    Csv,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

/// Arguments for the `ferret scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Target logins (users or organisations) to enumerate.
    pub targets: Vec<String>,

    /// Scan these clone URLs or local repository paths directly,
    /// skipping target enumeration.
    #[arg(long, value_name = "URL")]
    pub repo_url: Vec<String>,

    /// Hosting service to enumerate targets from.
    #[arg(long, value_enum, default_value_t)]
    pub host: Host,

    /// Path to `.ferret.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write rendered findings to a file instead of stdout
    /// (json and csv formats only).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Zero the secret text in stored findings.
    #[arg(long)]
    pub hide_secrets: bool,

    /// Scan files that look like test fixtures.
    #[arg(long)]
    pub scan_tests: bool,

    /// Minimum signature confidence level.
    #[arg(long, value_name = "LEVEL")]
    pub match_level: Option<u8>,

    /// Suppress per-finding notifications.
    #[arg(long)]
    pub silent: bool,

    /// Signature rule file overriding the embedded ruleset.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Clone depth for remote repositories (0 = full history).
    #[arg(long, value_name = "N")]
    pub clone_depth: Option<u32>,

    /// Include forked repositories.
    #[arg(long)]
    pub include_forks: bool,

    /// Also enumerate organisation members and their repositories.
    #[arg(long)]
    pub include_members: bool,
}

/// Arguments for the `ferret local` command.
#[derive(Debug, Parser)]
pub struct LocalArgs {
    /// Directory to scan.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to `.ferret.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write rendered findings to a file instead of stdout
    /// (json and csv formats only).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Zero the secret text in stored findings.
    #[arg(long)]
    pub hide_secrets: bool,

    /// Scan files that look like test fixtures.
    #[arg(long)]
    pub scan_tests: bool,

    /// Minimum signature confidence level.
    #[arg(long, value_name = "LEVEL")]
    pub match_level: Option<u8>,

    /// Suppress per-finding notifications.
    #[arg(long)]
    pub silent: bool,

    /// Signature rule file overriding the embedded ruleset.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

/// Arguments for the `ferret signatures` command.
#[derive(Debug, Parser)]
pub struct SignaturesArgs {
    /// Signature rule file overriding the embedded ruleset.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Minimum signature confidence level.
    #[arg(long, value_name = "LEVEL", default_value_t = 1)]
    pub match_level: u8,

    /// Show regexes, literals, and entropy thresholds.
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    let cli = Cli::from_arg_matches(&matches).expect("failed to parse arguments");
    cli
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scan(args) => commands::scan::run(&args),
        Command::Local(args) => commands::local::run(&args),
        Command::Signatures(args) => {
            commands::signatures::run(args.rules.as_deref(), args.match_level, args.verbose)
        }
    }
}

fn build_about() -> String {
    format!(
        r"
  {} digs through git history for accidentally committed secrets.

  Enumerates a user's or organisation's repositories, walks every
  commit, and matches file paths and content against a signature set.",
        colors::accent().apply_to("ferret").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    ferret scan acme                     Scan every repository of 'acme'
    ferret scan acme --host gitlab       Enumerate from GitLab instead
    ferret scan --repo-url URL           Scan one repository directly
    ferret scan acme --format json       Output findings as JSON
    ferret local ./checkout              Scan a directory without history
    ferret signatures --verbose          Show the loaded ruleset

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
