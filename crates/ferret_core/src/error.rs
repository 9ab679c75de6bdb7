use thiserror::Error;

/// Errors that can occur when loading or compiling a signature ruleset.
#[derive(Debug, Error)]
pub enum RulesetError {
    /// The ruleset file could not be read from disk.
    #[error("failed to read ruleset '{path}': {source}")]
    Read {
        /// Path to the ruleset file that could not be read.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The ruleset file contained invalid TOML or unexpected values.
    #[error("failed to parse ruleset: {source}")]
    Parse {
        /// The underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// A signature's regular expression failed to compile.
    #[error("invalid regex in signature '{name}': {source}")]
    InvalidRegex {
        /// Name of the signature whose expression is malformed.
        name: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A signature named a target part that does not exist.
    #[error("unknown target part '{part}' in signature '{name}'")]
    InvalidPart {
        /// Name of the signature with the unknown part.
        name: String,
        /// The unrecognised part value.
        part: String,
    },
}

/// Top-level error type for the ferret analysis pipeline.
///
/// Unifies errors from ruleset loading, configuration handling, and finding
/// assembly into a single type for callers that drive the full workflow.
#[derive(Debug, Error)]
pub enum FerretError {
    /// A ruleset could not be loaded or compiled.
    #[error(transparent)]
    Ruleset(#[from] RulesetError),

    /// Configuration could not be read, parsed, or written.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
