//! Path decomposition for signature matching.

use std::path::Path;

/// Decomposition of a candidate file path into the parts a signature can
/// target. Constructed fresh per file and never mutated.
#[derive(Debug, Clone)]
pub struct MatchFile {
    /// The full path as given, with forward slashes.
    pub path: String,
    /// The final path component.
    pub filename: String,
    /// The extension without the leading dot, or empty if there is none.
    pub extension: String,
}

impl MatchFile {
    /// Decomposes `path` into path, filename, and extension parts.
    #[must_use]
    pub fn new(path: &str) -> Self {
        let p = Path::new(path);
        let filename = p
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = p
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();

        Self {
            path: path.to_string(),
            filename,
            extension,
        }
    }
}
