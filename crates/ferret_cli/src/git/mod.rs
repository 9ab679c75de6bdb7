//! Git repository acquisition for history scanning.

mod history;

use std::fmt;
use std::num::NonZeroU32;
use std::path::Path;

use anyhow::Context as _;

pub use self::history::FileContent;

/// Marker error for repositories with no commits. Callers downcast to
/// this to log the skip at info level instead of as a failure.
#[derive(Debug)]
pub struct EmptyRepository;

impl fmt::Display for EmptyRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "repository has no commits")
    }
}

impl std::error::Error for EmptyRepository {}

/// Returns whether an acquisition error means the repository is empty.
#[must_use]
pub fn is_empty_repository(error: &anyhow::Error) -> bool {
    error.downcast_ref::<EmptyRepository>().is_some()
}

/// An acquired repository: either a temporary clone or a repository
/// opened in place.
///
/// Temporary clones are removed when this handle drops, on every exit
/// path including errors.
#[derive(Debug)]
pub struct Repo {
    inner: gix::Repository,
    /// Held for its Drop impl; removing it deletes the working copy.
    _checkout: Option<tempfile::TempDir>,
}

impl Repo {
    /// Acquires a repository from a clone URL or local path.
    ///
    /// An existing local path is opened in place and never removed;
    /// anything else is cloned into a temporary checkout that is removed
    /// when the handle drops. Fails with [`EmptyRepository`] when the
    /// repository has no commits.
    pub fn acquire(url: &str, depth: u32) -> anyhow::Result<Self> {
        if Path::new(url).exists() {
            Self::open(Path::new(url))
        } else {
            Self::clone(url, depth)
        }
    }

    fn open(path: &Path) -> anyhow::Result<Self> {
        let inner = gix::open(path).with_context(|| format!("failed to open repository '{}'", path.display()))?;
        ensure_not_empty(&inner)?;
        Ok(Self {
            inner,
            _checkout: None,
        })
    }

    fn clone(url: &str, depth: u32) -> anyhow::Result<Self> {
        let checkout = tempfile::TempDir::with_prefix("ferret-")
            .context("failed to create temporary checkout directory")?;

        let mut prepare = gix::prepare_clone(url, checkout.path())
            .with_context(|| format!("failed to prepare clone of '{url}'"))?;
        if let Some(depth) = NonZeroU32::new(depth) {
            prepare = prepare.with_shallow(gix::remote::fetch::Shallow::DepthAtRemote(depth));
        }

        let (mut preparing, _fetch) = prepare
            .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
            .with_context(|| format!("failed to fetch '{url}'"))?;
        let (inner, _checkout) = preparing
            .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
            .with_context(|| format!("failed to check out '{url}'"))?;

        ensure_not_empty(&inner)?;
        Ok(Self {
            inner,
            _checkout: Some(checkout),
        })
    }
}

fn ensure_not_empty(repo: &gix::Repository) -> anyhow::Result<()> {
    let unborn = repo.head().map(|head| head.is_unborn()).unwrap_or(true);
    if unborn {
        Err(anyhow::Error::new(EmptyRepository))
    } else {
        Ok(())
    }
}
