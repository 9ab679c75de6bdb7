//! GitHub enumeration client.

use serde::Deserialize;

use crate::USER_AGENT;
use crate::client::{BoxFuture, HostClient, Owner, OwnerKind, ProviderError, RemoteRepository};

const PROVIDER: &str = "GitHub";
const DEFAULT_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// Validates the shape of a GitHub access token.
///
/// Accepts classic 40-hex tokens, prefixed tokens (`ghp_`, `gho_`,
/// `ghu_`, `ghs_`, `ghr_`) and fine-grained `github_pat_` tokens.
/// A malformed token is a configuration error.
pub fn validate_token(token: &str) -> Result<(), ProviderError> {
    let alnum = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');

    let valid = if let Some(rest) = token.strip_prefix("github_pat_") {
        rest.len() == 82 && alnum(rest)
    } else if token.len() == 40 && token.bytes().all(|b| b.is_ascii_hexdigit()) {
        true
    } else {
        ["ghp_", "gho_", "ghu_", "ghs_", "ghr_"].iter().any(|prefix| {
            token
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.len() == 36 && alnum(rest))
        })
    };

    if valid {
        Ok(())
    } else {
        Err(ProviderError::MalformedToken { provider: PROVIDER })
    }
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    id: i64,
    login: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<ApiOwner> for Owner {
    fn from(api: ApiOwner) -> Self {
        let kind = if api.kind == "Organization" {
            OwnerKind::Organization
        } else {
            OwnerKind::User
        };
        Self {
            id: api.id,
            login: api.login,
            kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    id: i64,
    name: String,
    clone_url: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    fork: bool,
    owner: ApiOwner,
}

impl From<ApiRepository> for RemoteRepository {
    fn from(api: ApiRepository) -> Self {
        Self {
            id: api.id,
            owner: api.owner.login,
            name: api.name,
            clone_url: api.clone_url,
            default_branch: api.default_branch.unwrap_or_else(|| "main".to_string()),
            fork: api.fork,
        }
    }
}

/// Client for the GitHub REST API.
#[derive(Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Builds a client for api.github.com. The token shape is validated
    /// up front; a malformed token fails here, before any scan starts.
    pub fn new(token: Option<&str>) -> Result<Self, ProviderError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Builds a client against an alternate API root, e.g. a GitHub
    /// Enterprise instance.
    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self, ProviderError> {
        if let Some(token) = token {
            validate_token(token)?;
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::ClientInit(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    async fn get(&self, resource: &str) -> Result<reqwest::Response, ProviderError> {
        let mut request = self
            .http
            .get(format!("{}{resource}", self.base_url))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }
        Ok(request.send().await?)
    }

    async fn get_paginated<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<Vec<T>, ProviderError> {
        let mut all = Vec::new();
        for page in 1.. {
            let response = self
                .get(&format!("{resource}?per_page={PER_PAGE}&page={page}"))
                .await?;
            if !response.status().is_success() {
                return Err(ProviderError::Api {
                    provider: PROVIDER,
                    status: response.status().as_u16(),
                    resource: resource.to_string(),
                });
            }
            let batch: Vec<T> = response.json().await?;
            let done = batch.len() < PER_PAGE;
            all.extend(batch);
            if done {
                break;
            }
        }
        Ok(all)
    }
}

impl HostClient for GitHubClient {
    fn get_user_organization<'a>(
        &'a self,
        login: &'a str,
    ) -> BoxFuture<'a, Result<Owner, ProviderError>> {
        Box::pin(async move {
            let resource = format!("/users/{login}");
            let response = self.get(&resource).await?;
            match response.status().as_u16() {
                200 => {
                    let api: ApiOwner = response.json().await?;
                    Ok(api.into())
                }
                404 => Err(ProviderError::OwnerNotFound {
                    provider: PROVIDER,
                    login: login.to_string(),
                }),
                status => Err(ProviderError::Api {
                    provider: PROVIDER,
                    status,
                    resource,
                }),
            }
        })
    }

    fn get_repositories_from_owner<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> BoxFuture<'a, Result<Vec<RemoteRepository>, ProviderError>> {
        Box::pin(async move {
            let resource = match owner.kind {
                OwnerKind::User => format!("/users/{}/repos", owner.login),
                OwnerKind::Organization => format!("/orgs/{}/repos", owner.login),
            };
            let repositories: Vec<ApiRepository> = self.get_paginated(&resource).await?;
            Ok(repositories.into_iter().map(Into::into).collect())
        })
    }

    fn get_organization_members<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> BoxFuture<'a, Result<Vec<Owner>, ProviderError>> {
        Box::pin(async move {
            if owner.kind != OwnerKind::Organization {
                return Ok(Vec::new());
            }
            let resource = format!("/orgs/{}/members", owner.login);
            let members: Vec<ApiOwner> = self.get_paginated(&resource).await?;
            Ok(members.into_iter().map(Into::into).collect())
        })
    }
}
