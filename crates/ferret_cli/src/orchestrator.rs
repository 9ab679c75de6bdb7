//! Bounded worker pool driving repository analysis.
//!
//! All repositories are enqueued up front on a channel sized to the
//! repository count, then a fixed pool of workers drains it. Within one
//! repository, commit and change iteration are strictly sequential on
//! the owning worker.

use std::sync::atomic::{AtomicU64, Ordering};

use ferret_core::{
    ChangeKind, Commit, ContentSource, FileFilter, Finding, MatchFile, Repository, ScanStatus,
    Session,
};
#[cfg(feature = "tracing")]
use tracing::{debug, error, info};

use crate::git::{self, Repo};
use crate::ui;

/// Number of workers for a repository set of `repo_count`.
///
/// A single repository gets a single worker; otherwise the pool is the
/// configured thread budget capped at one below the repository count, so
/// the driving thread is never starved.
#[must_use]
pub fn worker_count(repo_count: usize, configured: usize) -> usize {
    if repo_count <= 1 {
        1
    } else {
        configured.max(1).min(repo_count - 1)
    }
}

/// Processes every discovered repository exactly once and returns when
/// all of them have been analysed or skipped.
pub fn run(session: &Session) {
    let repositories = session.repositories();
    let total = repositories.len();
    if total == 0 {
        session.set_status(ScanStatus::Finished);
        return;
    }

    let filter = FileFilter::new(&session.config);
    let workers = worker_count(total, session.config.threads);
    let processed = AtomicU64::new(0);
    let progress = session
        .config
        .should_notify()
        .then(|| ui::create_repository_progress(total as u64));

    let (tx, rx) = crossbeam_channel::bounded(total);
    for repository in repositories {
        if tx.send(repository).is_err() {
            break;
        }
    }
    drop(tx);

    session.set_status(ScanStatus::Analyzing);
    std::thread::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let filter = &filter;
            let processed = &processed;
            let progress = progress.as_ref();
            scope.spawn(move || {
                while let Ok(repository) = rx.recv() {
                    process_repository(session, filter, &repository);
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    session.update_progress(done, total as u64);
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                }
            });
        }
    });
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    session.set_status(ScanStatus::Finished);
}

/// Clones, walks, and matches a single repository. Failures skip the
/// repository without affecting the rest of the set; the working copy is
/// removed on every exit path by the acquisition handle's drop.
fn process_repository(session: &Session, filter: &FileFilter, repository: &Repository) {
    let repo = match Repo::acquire(&repository.clone_url, session.config.clone_depth) {
        Ok(repo) => repo,
        Err(error) => {
            if git::is_empty_repository(&error) {
                #[cfg(feature = "tracing")]
                info!(repository = %repository, "repository has no commits; skipping");
                ui::print_info(&format!("skipping {repository}: repository has no commits"));
            } else {
                #[cfg(feature = "tracing")]
                error!(repository = %repository, "clone failed: {error:#}");
                ui::print_error(&format!("failed to clone {repository}: {error:#}"));
            }
            return;
        }
    };
    session.update_stats(|s| s.repositories_cloned += 1);

    let commits = match repo.history() {
        Ok(commits) => commits,
        Err(error) => {
            #[cfg(feature = "tracing")]
            error!(repository = %repository, "history walk failed: {error:#}");
            ui::print_error(&format!("failed to read history of {repository}: {error:#}"));
            return;
        }
    };
    #[cfg(feature = "tracing")]
    debug!(repository = %repository, commits = commits.len(), "history loaded");

    for commit in &commits {
        let mut dirty = false;
        for change in repo.changes(commit) {
            session.update_stats(|s| s.files_total += 1);

            let path = change.path().to_string();
            let file = MatchFile::new(&path);
            let content = repo.change_content(commit, &change);

            if filter.should_skip(&file, content.size) {
                session.update_stats(|s| s.files_ignored += 1);
                continue;
            }
            session.update_stats(|s| s.files_scanned += 1);

            let source = match &content.text {
                Ok(text) => ContentSource::Text(text),
                Err(error) => ContentSource::Unreadable(error),
            };

            if match_file(session, &file, &path, source, change.kind, commit, repository) {
                dirty = true;
            }
        }

        session.update_stats(|s| s.commits_scanned += 1);
        if dirty {
            session.update_stats(|s| s.commits_dirty += 1);
        }
    }

    session.update_stats(|s| s.repositories_scanned += 1);
}

/// Evaluates every retained signature against one file, storing the
/// resulting findings. Returns whether anything matched.
pub fn match_file(
    session: &Session,
    file: &MatchFile,
    path: &str,
    source: ContentSource<'_>,
    action: ChangeKind,
    commit: &Commit,
    repository: &Repository,
) -> bool {
    let mut matched = false;

    for signature in &session.signatures.signatures {
        let occurrences = signature.extract_match(file, source, &session.signatures.safe_functions);
        if occurrences.is_empty() {
            continue;
        }

        for finding in Finding::assemble(
            signature,
            &occurrences,
            path,
            action,
            commit,
            repository,
            session.config.hide_secrets,
        ) {
            if session.config.should_notify() {
                ui::print_finding(&finding);
            }
            session.store_finding(finding);
            matched = true;
        }
    }

    matched
}
