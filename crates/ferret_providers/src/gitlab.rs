//! GitLab enumeration client.

use serde::Deserialize;

use crate::USER_AGENT;
use crate::client::{BoxFuture, HostClient, Owner, OwnerKind, ProviderError, RemoteRepository};

const PROVIDER: &str = "GitLab";
const DEFAULT_BASE_URL: &str = "https://gitlab.com";
const PER_PAGE: usize = 100;

/// Validates the shape of a GitLab access token.
///
/// Accepts `glpat-` prefixed personal access tokens and legacy 20-char
/// tokens. A malformed token is a configuration error.
pub fn validate_token(token: &str) -> Result<(), ProviderError> {
    let token_chars =
        |s: &str| s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    let valid = if let Some(rest) = token.strip_prefix("glpat-") {
        rest.len() == 20 && token_chars(rest)
    } else {
        token.len() == 20 && token_chars(token)
    };

    if valid {
        Ok(())
    } else {
        Err(ProviderError::MalformedToken { provider: PROVIDER })
    }
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: i64,
    username: String,
}

#[derive(Debug, Deserialize)]
struct ApiGroup {
    id: i64,
    path: String,
}

#[derive(Debug, Deserialize)]
struct ApiNamespace {
    path: String,
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: i64,
    path: String,
    http_url_to_repo: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    forked_from_project: Option<serde_json::Value>,
    namespace: ApiNamespace,
}

impl From<ApiProject> for RemoteRepository {
    fn from(api: ApiProject) -> Self {
        Self {
            id: api.id,
            owner: api.namespace.path,
            name: api.path,
            clone_url: api.http_url_to_repo,
            default_branch: api.default_branch.unwrap_or_else(|| "main".to_string()),
            fork: api.forked_from_project.is_some(),
        }
    }
}

/// Client for the GitLab REST API.
#[derive(Debug)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    /// Builds a client for gitlab.com. The token shape is validated up
    /// front; a malformed token fails here, before any scan starts.
    pub fn new(token: Option<&str>) -> Result<Self, ProviderError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Builds a client against a self-hosted GitLab instance.
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
            .get(format!("{}/api/v4{resource}", self.base_url))
            .header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("PRIVATE-TOKEN", token);
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

impl HostClient for GitLabClient {
    fn get_user_organization<'a>(
        &'a self,
        login: &'a str,
    ) -> BoxFuture<'a, Result<Owner, ProviderError>> {
        Box::pin(async move {
            // GitLab has no combined lookup: try a username search first,
            // then fall back to a group lookup.
            let response = self.get(&format!("/users?username={login}")).await?;
            if response.status().is_success() {
                let users: Vec<ApiUser> = response.json().await?;
                if let Some(user) = users.into_iter().next() {
                    return Ok(Owner {
                        id: user.id,
                        login: user.username,
                        kind: OwnerKind::User,
                    });
                }
            }

            let resource = format!("/groups/{login}");
            let response = self.get(&resource).await?;
            match response.status().as_u16() {
                200 => {
                    let group: ApiGroup = response.json().await?;
                    Ok(Owner {
                        id: group.id,
                        login: group.path,
                        kind: OwnerKind::Organization,
                    })
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
                OwnerKind::User => format!("/users/{}/projects", owner.id),
                OwnerKind::Organization => format!("/groups/{}/projects", owner.id),
            };
            let projects: Vec<ApiProject> = self.get_paginated(&resource).await?;
            Ok(projects.into_iter().map(Into::into).collect())
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
            let members: Vec<ApiUser> = self
                .get_paginated(&format!("/groups/{}/members", owner.id))
                .await?;
            Ok(members
                .into_iter()
                .map(|m| Owner {
                    id: m.id,
                    login: m.username,
                    kind: OwnerKind::User,
                })
                .collect())
        })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests use expect for clearer failure messages")]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn validate_token_accepts_prefixed_and_legacy_shapes() {
        assert!(validate_token(&format!("glpat-{}", "a".repeat(20))).is_ok());
        assert!(validate_token(&"x".repeat(20)).is_ok());
    }

    #[test]
    fn validate_token_rejects_malformed_shapes() {
        assert!(validate_token("").is_err());
        assert!(validate_token("glpat-short").is_err());
        assert!(validate_token("spaces are not valid").is_err());
    }

    #[tokio::test]
    async fn get_user_organization_prefers_user_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users"))
            .and(query_param("username", "dev"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 11, "username": "dev"}
            ])))
            .mount(&server)
            .await;

        let client = GitLabClient::with_base_url(None, &server.uri()).expect("client should build");
        let owner = client.get_user_organization("dev").await.expect("lookup should succeed");
        assert_eq!(owner.id, 11);
        assert_eq!(owner.kind, OwnerKind::User);
    }

    #[tokio::test]
    async fn get_user_organization_falls_back_to_group_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/groups/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 77, "path": "acme"
            })))
            .mount(&server)
            .await;

        let client = GitLabClient::with_base_url(None, &server.uri()).expect("client should build");
        let owner = client.get_user_organization("acme").await.expect("lookup should succeed");
        assert_eq!(owner.id, 77);
        assert_eq!(owner.kind, OwnerKind::Organization);
    }

    #[tokio::test]
    async fn unknown_login_maps_to_owner_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/groups/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GitLabClient::with_base_url(None, &server.uri()).expect("client should build");
        let result = client.get_user_organization("ghost").await;
        assert!(matches!(result, Err(ProviderError::OwnerNotFound { .. })));
    }

    #[tokio::test]
    async fn project_listing_marks_forks_and_fills_default_branch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/groups/77/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1,
                    "path": "widget",
                    "http_url_to_repo": "https://example.com/acme/widget.git",
                    "default_branch": "trunk",
                    "namespace": {"path": "acme"}
                },
                {
                    "id": 2,
                    "path": "forked",
                    "http_url_to_repo": "https://example.com/acme/forked.git",
                    "forked_from_project": {"id": 99},
                    "namespace": {"path": "acme"}
                }
            ])))
            .mount(&server)
            .await;

        let client = GitLabClient::with_base_url(None, &server.uri()).expect("client should build");
        let owner = Owner {
            id: 77,
            login: "acme".into(),
            kind: OwnerKind::Organization,
        };
        let repos = client
            .get_repositories_from_owner(&owner)
            .await
            .expect("listing should succeed");
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].default_branch, "trunk");
        assert!(!repos[0].fork);
        assert!(repos[1].fork);
        assert_eq!(repos[1].default_branch, "main");
    }
}
