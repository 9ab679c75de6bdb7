//! Core analysis pipeline for the ferret secret scanner.
//!
//! This crate provides signature-based secret detection over git history
//! and local file trees. It is embedded by the CLI; the enumeration and
//! clone machinery lives in sibling crates.
//!
//! # Main Types
//!
//! - [`SignatureSet`] - Compiled detection rules, filtered at load time
//! - [`Session`] - Mutex-guarded scan state: stats, targets, findings
//! - [`Finding`] - A detected secret with commit provenance
//! - [`FileFilter`] - Cheap pre-checks gating expensive matching
//! - [`ScanConfig`] - User configuration loaded from `.ferret.toml`
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`RulesetError`] - Ruleset loading and compilation failures
//! - [`ConfigError`] - Configuration loading/parsing failures
//! - [`FerretError`] - Top-level error enum combining the above
//!
//! The CLI crate (`ferret_cli`) uses `anyhow` for error propagation.

/// User configuration loaded from `.ferret.toml`.
pub mod config;
pub(crate) mod entropy;
/// Error types for ruleset and configuration loading.
pub mod error;
/// File filter stages applied before signature matching.
pub mod filter;
/// Finding assembly and deterministic identity.
pub mod finding;
/// Path decomposition for signature matching.
pub mod matchfile;
/// Domain types for targets, repositories, commits, and changes.
pub mod model;
/// Session-wide shared state and statistics.
pub mod session;
/// Detection rules, rulesets, and their evaluation.
pub mod signature;

pub use config::{ConfigError, OutputMode, ScanConfig};
pub use entropy::shannon_entropy;
pub use error::{FerretError, RulesetError};
pub use filter::FileFilter;
pub use finding::Finding;
pub use matchfile::MatchFile;
pub use model::{Change, ChangeKind, Commit, Repository, Target, TargetKind};
pub use session::{ScanStatus, Session, Stats};
pub use signature::{
    ContentSource, Occurrence, Part, SafeFunction, Signature, SignatureKind, SignatureSet,
};

/// Default filename for ferret configuration.
pub const CONFIG_FILENAME: &str = ".ferret.toml";
