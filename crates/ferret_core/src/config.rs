//! Session configuration loaded from `.ferret.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions that are skipped by default: binary formats, media, and
/// archives that cannot contain plain-text secrets worth matching.
pub const DEFAULT_SKIPPABLE_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "a", "o", "dylib", "class", "jar", "war", "png", "jpg", "jpeg", "gif",
    "svg", "ico", "bmp", "tif", "tiff", "webp", "woff", "woff2", "ttf", "eot", "otf", "mp3",
    "mp4", "webm", "mov", "avi", "zip", "gz", "tar", "bz2", "xz", "7z", "rar", "pdf", "psd",
];

/// Path substrings that are skipped by default: dependency caches and
/// lockfiles whose contents are third-party, not the owner's.
pub const DEFAULT_SKIPPABLE_PATHS: &[&str] = &[
    "node_modules/",
    "vendor/bundle",
    "vendor/cache",
    "packages/",
    ".git/",
];

/// How findings are rendered once the scan completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable text, one block per finding.
    #[default]
    Text,
    /// A JSON array of findings.
    Json,
    /// CSV rows, one per finding, with a header.
    Csv,
}

/// Session-wide configuration loaded from `.ferret.toml`.
///
/// All fields are optional in the file and default to permissive values
/// (scan everything above the default confidence floor).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker thread budget. The orchestrator clamps this to the
    /// repository count, so oversizing is harmless.
    pub threads: usize,

    /// Maximum file size in megabytes. Larger files are skipped.
    pub max_file_size_mb: u64,

    /// Extensions to skip, merged with the built-in defaults.
    /// Compared case-insensitively without the leading dot.
    pub skippable_extensions: Vec<String>,

    /// Path substrings to skip, merged with the built-in defaults.
    /// Compared case-insensitively.
    pub skippable_paths: Vec<String>,

    /// Zero the secret text in stored findings.
    pub hide_secrets: bool,

    /// Scan files the test-file heuristic would otherwise skip.
    pub scan_tests: bool,

    /// Minimum signature confidence level. Signatures below this are
    /// dropped at load time.
    pub match_level: u8,

    /// Suppress per-finding real-time notifications.
    pub silent: bool,

    /// Output rendering mode.
    pub output: OutputMode,

    /// Clone depth for remote repositories; 0 means full history.
    pub clone_depth: u32,

    /// Path to a signature rule file overriding the embedded ruleset.
    pub rules_path: Option<PathBuf>,

    /// GitHub personal access token for repository enumeration.
    pub github_access_token: Option<String>,

    /// GitLab personal access token for repository enumeration.
    pub gitlab_access_token: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: num_threads(),
            max_file_size_mb: 10,
            skippable_extensions: Vec::new(),
            skippable_paths: Vec::new(),
            hide_secrets: false,
            scan_tests: false,
            match_level: 3,
            silent: false,
            output: OutputMode::Text,
            clone_depth: 0,
            rules_path: None,
            github_access_token: None,
            gitlab_access_token: None,
        }
    }
}

fn num_threads() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

impl ScanConfig {
    /// Creates a default configuration with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a `.ferret.toml` file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Returns the effective skip-extension list: defaults plus user
    /// additions, lowercased.
    #[must_use]
    pub fn effective_skippable_extensions(&self) -> Vec<String> {
        DEFAULT_SKIPPABLE_EXTENSIONS
            .iter()
            .map(|e| (*e).to_string())
            .chain(self.skippable_extensions.iter().map(|e| e.to_lowercase()))
            .collect()
    }

    /// Returns the effective skip-path list: defaults plus user
    /// additions, lowercased.
    #[must_use]
    pub fn effective_skippable_paths(&self) -> Vec<String> {
        DEFAULT_SKIPPABLE_PATHS
            .iter()
            .map(|p| (*p).to_string())
            .chain(self.skippable_paths.iter().map(|p| p.to_lowercase()))
            .collect()
    }

    /// Maximum file size in bytes.
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1_048_576
    }

    /// Whether per-finding notifications should be emitted as findings
    /// are stored. Structured output modes imply silence.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        !self.silent && self.output == OutputMode::Text
    }
}

/// Errors that can occur when reading or parsing a `.ferret.toml`
/// configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path to the config file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML or unexpected values.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path to the config file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap known-good values")]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn default_config_uses_text_output_and_match_level_three() {
        let config = ScanConfig::default();
        assert_eq!(config.match_level, 3);
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.output, OutputMode::Text);
        assert!(!config.hide_secrets);
        assert!(!config.scan_tests);
        assert!(config.threads >= 1);
    }

    #[test]
    fn from_toml_returns_defaults_for_empty_string() {
        let config = ScanConfig::from_toml("").unwrap();
        assert_eq!(config.match_level, 3);
        assert!(config.skippable_extensions.is_empty());
    }

    #[test]
    fn from_toml_parses_output_modes() {
        for (toml, expected) in [
            (r#"output = "text""#, OutputMode::Text),
            (r#"output = "json""#, OutputMode::Json),
            (r#"output = "csv""#, OutputMode::Csv),
        ] {
            let config = ScanConfig::from_toml(toml).unwrap();
            assert_eq!(config.output, expected);
        }
    }

    #[test]
    fn from_toml_parses_partial_overrides() {
        let toml = r#"
            threads = 4
            max_file_size_mb = 2
            hide_secrets = true
            skippable_extensions = ["LOG"]
            skippable_paths = ["Generated/"]
        "#;
        let config = ScanConfig::from_toml(toml).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.max_file_size_mb, 2);
        assert!(config.hide_secrets);
        assert_eq!(config.skippable_extensions, vec!["LOG"]);
    }

    #[test]
    fn from_toml_rejects_malformed_toml_syntax() {
        assert!(ScanConfig::from_toml("not { valid").is_err());
    }

    #[test]
    fn from_toml_rejects_unknown_output_mode() {
        assert!(ScanConfig::from_toml(r#"output = "xml""#).is_err());
    }

    #[test]
    fn load_returns_default_config_when_file_not_found() {
        let config = ScanConfig::load(Path::new("/nonexistent/.ferret.toml")).unwrap();
        assert_eq!(config.match_level, 3);
    }

    #[test]
    fn load_parses_existing_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "match_level = 1").unwrap();

        let config = ScanConfig::load(file.path()).unwrap();
        assert_eq!(config.match_level, 1);
    }

    #[test]
    fn effective_extension_list_merges_and_lowercases_user_entries() {
        let config = ScanConfig {
            skippable_extensions: vec!["LOG".into()],
            ..ScanConfig::default()
        };
        let effective = config.effective_skippable_extensions();
        assert!(effective.contains(&"png".to_string()));
        assert!(effective.contains(&"log".to_string()));
    }

    #[test]
    fn effective_path_list_merges_defaults_and_user_entries() {
        let config = ScanConfig {
            skippable_paths: vec!["Generated/".into()],
            ..ScanConfig::default()
        };
        let effective = config.effective_skippable_paths();
        assert!(effective.contains(&"node_modules/".to_string()));
        assert!(effective.contains(&"generated/".to_string()));
    }

    #[test]
    fn max_file_size_converts_megabytes_to_bytes() {
        let config = ScanConfig {
            max_file_size_mb: 2,
            ..ScanConfig::default()
        };
        assert_eq!(config.max_file_size_bytes(), 2_097_152);
    }

    #[test]
    fn should_notify_is_false_when_silent_or_structured() {
        let mut config = ScanConfig::default();
        assert!(config.should_notify());

        config.silent = true;
        assert!(!config.should_notify());

        config.silent = false;
        config.output = OutputMode::Json;
        assert!(!config.should_notify());

        config.output = OutputMode::Csv;
        assert!(!config.should_notify());
    }
}
