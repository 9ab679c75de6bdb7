//! Cheap pre-checks gating expensive signature matching.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ScanConfig;
use crate::matchfile::MatchFile;

static TEST_DIR: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
    Regex::new(r"/test[^/]*/").unwrap()
});

/// Filter stages applied to every candidate file, first match wins.
///
/// Built once per session from the configuration; the skip lists are
/// pre-lowercased so per-file checks stay allocation-light.
#[derive(Debug)]
pub struct FileFilter {
    skip_extensions: Vec<String>,
    skip_paths: Vec<String>,
    max_bytes: u64,
    scan_tests: bool,
}

impl FileFilter {
    /// Builds the filter from session configuration.
    #[must_use]
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            skip_extensions: config.effective_skippable_extensions(),
            skip_paths: config.effective_skippable_paths(),
            max_bytes: config.max_file_size_bytes(),
            scan_tests: config.scan_tests,
        }
    }

    /// Decides whether `file` should be skipped before matching.
    ///
    /// Stages in order: test-file heuristics (unless scanning tests),
    /// size limit, skippable extension, skippable path substring.
    #[must_use]
    pub fn should_skip(&self, file: &MatchFile, size: u64) -> bool {
        if !self.scan_tests && is_test_file(file) {
            return true;
        }
        if size > self.max_bytes {
            return true;
        }

        let extension = file.extension.to_lowercase();
        if self.skip_extensions.iter().any(|e| *e == extension) {
            return true;
        }

        let path = file.path.to_lowercase();
        self.skip_paths.iter().any(|p| path.contains(p.as_str()))
    }
}

/// Heuristic for files that belong to a test suite rather than shipped
/// configuration or source.
fn is_test_file(file: &MatchFile) -> bool {
    let lower = file.path.to_lowercase();
    if lower.starts_with("test/") || TEST_DIR.is_match(&lower) {
        return true;
    }

    if file.filename.contains("Test") || file.filename.contains("_test_") {
        return true;
    }

    let stem = file
        .filename
        .strip_suffix(&format!(".{}", file.extension))
        .unwrap_or(&file.filename);
    stem.ends_with("_test")
}
