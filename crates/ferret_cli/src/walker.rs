//! Local path enumeration with a fixed timeout.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use ignore::WalkBuilder;

use crate::ui;

/// Hard ceiling on path enumeration. The per-repository pipeline has no
/// timeout of its own; this applies only to local directory walks.
const WALK_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Enumerates candidate files under `root`, honouring `.gitignore` rules
/// but including hidden files (dotfiles are prime secret carriers).
///
/// Permission-denied entries are reported and skipped. Enumeration is
/// abandoned with a warning if it exceeds [`WALK_TIMEOUT`].
#[must_use]
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let root = root.to_path_buf();

    let walker = std::thread::spawn(move || {
        let walk = WalkBuilder::new(&root)
            .hidden(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();
        for entry in walk {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|t| t.is_file())
                        && tx.send(entry.into_path()).is_err()
                    {
                        break;
                    }
                }
                Err(error) => ui::print_warning(&format!("skipping path: {error}")),
            }
        }
    });

    let deadline = Instant::now() + WALK_TIMEOUT;
    let mut files = Vec::new();
    loop {
        match rx.recv_deadline(deadline) {
            Ok(path) => files.push(path),
            Err(RecvTimeoutError::Timeout) => {
                ui::print_warning("path enumeration timed out after one hour; scanning what was found");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(rx);
    let _ = walker.join();
    files
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap known-good values")]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn collects_nested_and_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "b").unwrap();

        let mut names: Vec<String> = collect_files(dir.path())
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();

        assert_eq!(names, vec![".env", "a.txt", "b.txt"]);
    }

    #[test]
    fn honours_gitignore_rules() {
        let dir = tempfile::tempdir().unwrap();
        // .gitignore is only honoured inside a git work tree
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".gitignore"), "ignored.log\n").unwrap();
        fs::write(dir.path().join("ignored.log"), "x").unwrap();
        fs::write(dir.path().join("kept.txt"), "x").unwrap();

        let files = collect_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        assert!(names.contains(&"kept.txt".to_string()));
        assert!(!names.contains(&"ignored.log".to_string()));
    }
}
