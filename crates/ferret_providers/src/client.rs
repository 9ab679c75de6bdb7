//! Enumeration client contract and shared types.

use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// A pinned, boxed, `Send` future used as the return type for async
/// enumeration calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur while talking to a hosting service.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP client could not be initialised.
    #[error("failed to initialize HTTP client: {0}")]
    ClientInit(String),

    /// An API token does not have the provider's expected shape. This is
    /// a configuration error; the scan must not proceed with it.
    #[error("malformed {provider} access token")]
    MalformedToken {
        /// Provider the token was supplied for.
        provider: &'static str,
    },

    /// An HTTP request to the provider's API failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider's API answered with an unexpected status.
    #[error("{provider} API returned {status} for '{resource}'")]
    Api {
        /// Provider that answered.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// The resource that was requested.
        resource: String,
    },

    /// The requested owner does not exist on the provider.
    #[error("owner '{login}' not found on {provider}")]
    OwnerNotFound {
        /// Provider that was queried.
        provider: &'static str,
        /// The login that could not be resolved.
        login: String,
    },
}

/// Whether an owner is an individual account or a group account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerKind {
    /// An individual user account.
    User,
    /// An organisation (GitHub) or group (GitLab).
    Organization,
}

/// An account that owns repositories on a hosting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// Stable numeric identifier assigned by the service.
    pub id: i64,
    /// Login name.
    pub login: String,
    /// User or organisation.
    pub kind: OwnerKind,
}

/// A repository descriptor as reported by a hosting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRepository {
    /// Stable numeric identifier assigned by the service.
    pub id: i64,
    /// Login of the owning account.
    pub owner: String,
    /// Repository name without the owner prefix.
    pub name: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Name of the default branch.
    pub default_branch: String,
    /// Whether the repository is a fork.
    pub fork: bool,
}

/// Contract implemented by each hosting-service client.
///
/// All calls are read-only enumeration; nothing here mutates remote
/// state. Implementations paginate internally and return complete lists.
pub trait HostClient: Send + Sync {
    /// Resolves a login to an owner, deciding whether it is a user or an
    /// organisation.
    fn get_user_organization<'a>(
        &'a self,
        login: &'a str,
    ) -> BoxFuture<'a, Result<Owner, ProviderError>>;

    /// Lists every repository belonging to an owner.
    fn get_repositories_from_owner<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> BoxFuture<'a, Result<Vec<RemoteRepository>, ProviderError>>;

    /// Lists the members of an organisation. Returns an empty list for
    /// individual users.
    fn get_organization_members<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> BoxFuture<'a, Result<Vec<Owner>, ProviderError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_names_the_offending_token_provider() {
        let error = ProviderError::MalformedToken { provider: "GitHub" };
        assert_eq!(error.to_string(), "malformed GitHub access token");
    }

    #[test]
    fn api_error_display_includes_status_and_resource() {
        let error = ProviderError::Api {
            provider: "GitLab",
            status: 403,
            resource: "/api/v4/groups/acme".into(),
        };
        let message = error.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("/api/v4/groups/acme"));
    }
}
