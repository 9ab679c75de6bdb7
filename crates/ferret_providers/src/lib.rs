//! Hosting-service enumeration clients for the ferret secret scanner.
//!
//! This crate resolves scan targets (users and organisations) to concrete
//! repository lists via the GitHub and GitLab REST APIs. Everything here
//! is read-only enumeration; cloning and analysis live elsewhere.

mod client;
mod github;
mod gitlab;

pub use client::{BoxFuture, HostClient, Owner, OwnerKind, ProviderError, RemoteRepository};
pub use github::{GitHubClient, validate_token as validate_github_token};
pub use gitlab::{GitLabClient, validate_token as validate_gitlab_token};

/// HTTP `User-Agent` header sent with every enumeration request.
pub(crate) const USER_AGENT: &str = concat!("ferret-scanner/", env!("CARGO_PKG_VERSION"));
