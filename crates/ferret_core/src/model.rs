//! Domain types flowing through the analysis pipeline.
//!
//! A [`Target`] is an owner (user or organisation) selected for scanning.
//! Each target contributes [`Repository`] descriptors, which the orchestrator
//! clones and walks commit by commit. A [`Commit`] carries provenance
//! metadata, and a [`Change`] is one file-level delta within a commit.
//!
//! All of these types are created once and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An owner (user or organisation) selected as a scan target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Stable numeric identifier assigned by the hosting service.
    pub id: i64,
    /// Login name on the hosting service.
    pub login: String,
    /// Whether this target is a user or an organisation.
    pub kind: TargetKind,
}

/// Classification of a scan target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// An individual user account.
    User,
    /// An organisation or group account.
    Organization,
}

/// Descriptor for one repository to scan.
///
/// Consumed exactly once by the orchestrator: cloned, analysed, and the
/// working copy removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Stable numeric identifier assigned by the hosting service.
    pub id: i64,
    /// Login of the owning user or organisation.
    pub owner: String,
    /// Repository name without the owner prefix.
    pub name: String,
    /// URL (or local path) the repository is cloned from.
    pub clone_url: String,
    /// Name of the default branch.
    pub default_branch: String,
}

impl Repository {
    /// Returns the `owner/name` form used in logs and output.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Provenance metadata for one commit, ordered newest-first by the extractor.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Full hex object hash.
    pub hash: String,
    /// Author name from the commit signature.
    pub author: String,
    /// Full commit message.
    pub message: String,
    /// Number of parents; zero marks a root commit.
    pub parent_count: usize,
}

/// How a file changed between a commit and its first parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The file was added in this commit.
    Insert,
    /// The file existed before and its content changed.
    Modify,
    /// The file was removed in this commit.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "Insert"),
            Self::Modify => write!(f, "Modify"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// One file-level delta within a commit, derived from a tree diff against
/// the first parent (or the empty tree for root commits).
#[derive(Debug, Clone)]
pub struct Change {
    /// The kind of delta.
    pub kind: ChangeKind,
    /// Path before the change; empty for insertions.
    pub old_path: String,
    /// Path after the change; empty for deletions.
    pub new_path: String,
}

impl Change {
    /// Returns the path affected by this change: the old path for deletions,
    /// the new path otherwise.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.kind {
            ChangeKind::Delete => &self.old_path,
            ChangeKind::Insert | ChangeKind::Modify => &self.new_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_full_name_joins_owner_and_name() {
        let repo = Repository {
            id: 1,
            owner: "acme".into(),
            name: "widget".into(),
            clone_url: "https://example.com/acme/widget.git".into(),
            default_branch: "main".into(),
        };
        assert_eq!(repo.full_name(), "acme/widget");
        assert_eq!(format!("{repo}"), "acme/widget");
    }

    #[test]
    fn change_path_reports_old_path_for_deletions() {
        let change = Change {
            kind: ChangeKind::Delete,
            old_path: "old/secret.pem".into(),
            new_path: String::new(),
        };
        assert_eq!(change.path(), "old/secret.pem");
    }

    #[test]
    fn change_path_reports_new_path_for_inserts_and_modifies() {
        for kind in [ChangeKind::Insert, ChangeKind::Modify] {
            let change = Change {
                kind,
                old_path: "before.txt".into(),
                new_path: "after.txt".into(),
            };
            assert_eq!(change.path(), "after.txt");
        }
    }

    #[test]
    fn change_kind_display_matches_action_names() {
        assert_eq!(format!("{}", ChangeKind::Insert), "Insert");
        assert_eq!(format!("{}", ChangeKind::Modify), "Modify");
        assert_eq!(format!("{}", ChangeKind::Delete), "Delete");
    }
}
