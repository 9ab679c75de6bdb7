//! CLI command handlers.

/// Local directory scanning without git history.
pub mod local;
/// Remote and repository-URL scanning over git history.
pub mod scan;
/// Signature listing and inspection.
pub mod signatures;

use std::path::Path;

use anyhow::Context as _;
use ferret_core::{CONFIG_FILENAME, ScanConfig, Session, SignatureSet};

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;

/// Per-command overrides applied on top of the loaded configuration.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Worker thread budget.
    pub threads: Option<usize>,
    /// Output mode.
    pub output: Option<ferret_core::OutputMode>,
    /// Zero secret text in stored findings.
    pub hide_secrets: bool,
    /// Scan files the test heuristics would skip.
    pub scan_tests: bool,
    /// Minimum signature confidence.
    pub match_level: Option<u8>,
    /// Suppress per-finding notifications.
    pub silent: bool,
    /// Signature rule file overriding the embedded ruleset.
    pub rules: Option<std::path::PathBuf>,
    /// Clone depth for remote repositories.
    pub clone_depth: Option<u32>,
}

/// Loads configuration, applies CLI overrides, compiles the ruleset, and
/// builds a session.
///
/// An unreadable or malformed rule file is a configuration error: it
/// propagates out and terminates the process before any scanning starts.
pub fn build_session(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Session> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(CONFIG_FILENAME).to_path_buf());
    let mut config = ScanConfig::load(&path).context("failed to load configuration")?;

    if let Some(threads) = overrides.threads {
        config.threads = threads;
    }
    if let Some(output) = overrides.output {
        config.output = output;
    }
    if overrides.hide_secrets {
        config.hide_secrets = true;
    }
    if overrides.scan_tests {
        config.scan_tests = true;
    }
    if let Some(level) = overrides.match_level {
        config.match_level = level;
    }
    if overrides.silent {
        config.silent = true;
    }
    if let Some(rules) = &overrides.rules {
        config.rules_path = Some(rules.clone());
    }
    if let Some(depth) = overrides.clone_depth {
        config.clone_depth = depth;
    }

    let signatures = match &config.rules_path {
        Some(rules) => SignatureSet::load(rules, config.match_level)
            .context("failed to load signature ruleset")?,
        None => SignatureSet::embedded(config.match_level)
            .context("failed to compile embedded signature ruleset")?,
    };

    Ok(Session::new(config, signatures))
}
