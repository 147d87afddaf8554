//! forge::github
//!
//! GitHub forge implementation using the GraphQL API and the `gh` CLI.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. It uses:
//! - GraphQL API for repository listings (owner and starred)
//! - `gh repo create` for creating a repository from a template, so the
//!   user's `gh` configuration (protocol, credentials) applies to the clone
//!
//! # Endpoints
//!
//! - `github.com`: `https://api.github.com/graphql`
//! - Enterprise hosts: `https://HOST/api/graphql`
//!
//! # Example
//!
//! ```ignore
//! use gh_template::auth::GhTokenProvider;
//! use gh_template::forge::github::GitHubForge;
//! use gh_template::forge::{CatalogSource, Forge};
//! use std::sync::Arc;
//!
//! let forge = GitHubForge::new(Arc::new(GhTokenProvider::new("github.com")));
//! let page = forge.repositories(&CatalogSource::Starred, None).await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::process::Command;

use super::traits::{
    CatalogSource, CreateRepoRequest, Forge, ForgeError, PageCursor, RepositoryPage,
    RepositoryRecord, PAGE_SIZE,
};
use crate::auth::{AuthError, TokenProvider, GITHUB_COM};

/// Default GitHub GraphQL endpoint.
const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "gh-template";

/// Repositories of a user or organization.
const QUERY_REPOSITORIES: &str = r#"
query ($owner: String!, $fork: Boolean, $limit: Int = 50, $after: String) {
  repositoryOwner(login: $owner) {
    repositories(isFork: $fork, first: $limit, after: $after) {
      nodes {
        owner {
          login
        }
        name
        description
        isTemplate
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

/// Repositories starred by the authenticated user.
const QUERY_STARRED_REPOSITORIES: &str = r#"
query ($limit: Int = 50, $after: String) {
  viewer {
    repositories: starredRepositories(first: $limit, after: $after) {
      nodes {
        owner {
          login
        }
        name
        description
        isTemplate
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

/// GraphQL endpoint for a host.
///
/// # Example
///
/// ```
/// use gh_template::forge::github::graphql_endpoint;
///
/// assert_eq!(graphql_endpoint("github.com"), "https://api.github.com/graphql");
/// assert_eq!(graphql_endpoint("ghe.io"), "https://ghe.io/api/graphql");
/// ```
pub fn graphql_endpoint(host: &str) -> String {
    if host.eq_ignore_ascii_case(GITHUB_COM) {
        GRAPHQL_ENDPOINT.to_string()
    } else {
        format!("https://{}/api/graphql", host)
    }
}

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Token provider for the forge host
    token_provider: Arc<dyn TokenProvider>,
    /// Forge host (e.g., "github.com")
    host: String,
    /// GraphQL endpoint (configurable for tests)
    endpoint: String,
    /// `gh` executable used for repository creation
    gh_program: String,
}

impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("host", &self.host)
            .field("endpoint", &self.endpoint)
            .field("gh_program", &self.gh_program)
            .finish_non_exhaustive()
    }
}

impl GitHubForge {
    /// Create a forge for the provider's host.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        let endpoint = graphql_endpoint(provider.host());
        Self::with_endpoint(provider, endpoint)
    }

    /// Create a forge that posts GraphQL queries to `endpoint`.
    pub fn with_endpoint(provider: Arc<dyn TokenProvider>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            host: provider.host().to_string(),
            token_provider: provider,
            endpoint: endpoint.into(),
            gh_program: "gh".to_string(),
        }
    }

    /// Use a different `gh` executable for repository creation.
    pub fn with_gh_program(mut self, program: impl Into<String>) -> Self {
        self.gh_program = program.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let token = self
            .token_provider
            .bearer_token()
            .await
            .map_err(|e| match e {
                AuthError::NotAuthenticated(_) => ForgeError::AuthRequired(e.to_string()),
                other => ForgeError::AuthFailed(other.to_string()),
            })?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Post a GraphQL query and decode its `data`.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ForgeError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        let result: GraphQLResponse<T> =
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse GraphQL response: {}", e),
            })?;

        if let Some(errors) = result.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ForgeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        result.data.ok_or_else(|| ForgeError::ApiError {
            status: status.as_u16(),
            message: "GraphQL response contained no data".into(),
        })
    }

    async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Query variables for one page. `after` is omitted for the first page.
fn page_variables(source: &CatalogSource, after: Option<&str>) -> serde_json::Value {
    let mut variables = serde_json::Map::new();
    if let CatalogSource::Owner(owner) = source {
        variables.insert("owner".into(), owner.clone().into());
    }
    variables.insert("limit".into(), PAGE_SIZE.into());
    if let Some(after) = after {
        variables.insert("after".into(), after.into());
    }
    serde_json::Value::Object(variables)
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn repositories(
        &self,
        source: &CatalogSource,
        after: Option<&str>,
    ) -> Result<RepositoryPage, ForgeError> {
        let variables = page_variables(source, after);
        tracing::debug!(?source, ?after, "querying repositories");

        let connection = match source {
            CatalogSource::Owner(owner) => {
                let data: OwnerData = self.graphql(QUERY_REPOSITORIES, variables).await?;
                data.repository_owner
                    .ok_or_else(|| ForgeError::NotFound(format!("owner '{}'", owner)))?
                    .repositories
            }
            CatalogSource::Starred => {
                let data: ViewerData = self.graphql(QUERY_STARRED_REPOSITORIES, variables).await?;
                data.viewer.repositories
            }
        };

        Ok(connection.into())
    }

    async fn create_repository(
        &self,
        request: &CreateRepoRequest,
    ) -> Result<PathBuf, ForgeError> {
        let mut args = vec![
            "repo".to_string(),
            "create".to_string(),
            request.name.clone(),
            "--template".to_string(),
            request.template.clone(),
            "--clone".to_string(),
        ];
        args.extend(request.options.to_args());

        tracing::debug!(program = %self.gh_program, ?args, workdir = %request.workdir.display(), "creating repository");

        let output = Command::new(&self.gh_program)
            .args(&args)
            .current_dir(&request.workdir)
            .env("GH_HOST", &self.host)
            .output()
            .await
            .map_err(|e| ForgeError::CommandFailed {
                command: format!("{} repo create {}", self.gh_program, request.name),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ForgeError::CommandFailed {
                command: format!("{} repo create {}", self.gh_program, request.name),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(request.clone_dir())
    }
}

// GitHub API response types

#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GraphQL response wrapper.
#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error format.
#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerData {
    repository_owner: Option<RepositoriesField>,
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: RepositoriesField,
}

#[derive(Deserialize)]
struct RepositoriesField {
    repositories: RepositoryConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    #[serde(default)]
    nodes: Vec<GitHubRepository>,
    page_info: GitHubPageInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubRepository {
    owner: GitHubOwner,
    name: String,
    description: Option<String>,
    is_template: bool,
}

#[derive(Deserialize)]
struct GitHubOwner {
    login: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubPageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl From<GitHubRepository> for RepositoryRecord {
    fn from(repo: GitHubRepository) -> Self {
        RepositoryRecord {
            owner: repo.owner.login,
            name: repo.name,
            description: repo.description,
            is_template: repo.is_template,
        }
    }
}

impl From<RepositoryConnection> for RepositoryPage {
    fn from(connection: RepositoryConnection) -> Self {
        RepositoryPage {
            nodes: connection.nodes.into_iter().map(Into::into).collect(),
            cursor: PageCursor {
                end_cursor: connection.page_info.end_cursor,
                has_next_page: connection.page_info.has_next_page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn provider(host: &str) -> Arc<dyn TokenProvider> {
        Arc::new(StaticTokenProvider::new(host, "test-token"))
    }

    mod construction {
        use super::*;

        #[test]
        fn github_com_endpoint() {
            let forge = GitHubForge::new(provider("github.com"));
            assert_eq!(forge.endpoint(), "https://api.github.com/graphql");
            assert_eq!(forge.host(), "github.com");
            assert_eq!(forge.name(), "github");
        }

        #[test]
        fn enterprise_endpoint() {
            let forge = GitHubForge::new(provider("ghe.example.com"));
            assert_eq!(forge.endpoint(), "https://ghe.example.com/api/graphql");
        }

        #[test]
        fn debug_does_not_expose_token() {
            let forge = GitHubForge::new(provider("github.com"));
            let debug = format!("{:?}", forge);
            assert!(!debug.contains("test-token"));
            assert!(debug.contains("GitHubForge"));
        }
    }

    mod variables {
        use super::*;

        #[test]
        fn owner_first_page_has_no_after() {
            let vars = page_variables(&CatalogSource::Owner("octo".into()), None);
            assert_eq!(vars, serde_json::json!({"owner": "octo", "limit": 50}));
        }

        #[test]
        fn starred_page_with_cursor() {
            let vars = page_variables(&CatalogSource::Starred, Some("PAGE_1"));
            assert_eq!(vars, serde_json::json!({"limit": 50, "after": "PAGE_1"}));
        }

        #[test]
        fn empty_cursor_is_sent() {
            let vars = page_variables(&CatalogSource::Starred, Some(""));
            assert_eq!(vars["after"], "");
        }
    }

    mod decoding {
        use super::*;

        #[test]
        fn owner_connection_into_page() {
            let json = serde_json::json!({
                "repositoryOwner": {
                    "repositories": {
                        "nodes": [
                            {"owner": {"login": "a"}, "name": "c", "description": "description c", "isTemplate": true},
                            {"owner": {"login": "a"}, "name": "z", "description": null, "isTemplate": false}
                        ],
                        "pageInfo": {"hasNextPage": true, "endCursor": "PAGE_1"}
                    }
                }
            });

            let data: OwnerData = serde_json::from_value(json).unwrap();
            let page: RepositoryPage = data.repository_owner.unwrap().repositories.into();

            assert_eq!(page.nodes.len(), 2);
            assert_eq!(page.nodes[0].key(), "a/c");
            assert_eq!(page.nodes[0].description.as_deref(), Some("description c"));
            assert!(!page.nodes[1].is_template);
            assert_eq!(page.nodes[1].description, None);
            assert!(page.cursor.has_next_page);
            assert_eq!(page.cursor.end_cursor.as_deref(), Some("PAGE_1"));
        }

        #[test]
        fn null_owner_decodes_as_none() {
            let data: OwnerData =
                serde_json::from_value(serde_json::json!({"repositoryOwner": null})).unwrap();
            assert!(data.repository_owner.is_none());
        }
    }

    #[cfg(unix)]
    mod create {
        use super::*;
        use crate::core::config::RepoOptions;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable script standing in for `gh`.
        fn fake_gh(dir: &std::path::Path, body: &str) -> PathBuf {
            let path = dir.join("fake-gh");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn passes_arguments_and_returns_clone_dir() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.txt");
            let gh = fake_gh(
                dir.path(),
                &format!("echo \"$@\" > {}\necho \"$GH_HOST\" >> {}", log.display(), log.display()),
            );

            let forge = GitHubForge::new(provider("github.com"))
                .with_gh_program(gh.to_string_lossy());
            let request = CreateRepoRequest {
                name: "octo/app".into(),
                template: "octo/template".into(),
                options: RepoOptions::builder().private(true).build().unwrap(),
                workdir: dir.path().to_path_buf(),
            };

            let path = forge.create_repository(&request).await.unwrap();
            assert_eq!(path, dir.path().join("app"));

            let logged = std::fs::read_to_string(&log).unwrap();
            assert_eq!(
                logged,
                "repo create octo/app --template octo/template --clone --private\ngithub.com\n"
            );
        }

        #[tokio::test]
        async fn failure_carries_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let gh = fake_gh(dir.path(), "echo 'name already exists on this account' >&2\nexit 1");

            let forge = GitHubForge::new(provider("github.com"))
                .with_gh_program(gh.to_string_lossy());
            let request = CreateRepoRequest {
                name: "app".into(),
                template: "octo/template".into(),
                options: RepoOptions::default(),
                workdir: dir.path().to_path_buf(),
            };

            let err = forge.create_repository(&request).await.unwrap_err();
            match err {
                ForgeError::CommandFailed { stderr, .. } => {
                    assert_eq!(stderr, "name already exists on this account");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
