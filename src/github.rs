use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::FetchError;

static LAST_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"page=(\d+)>; rel="last""#).expect("last-page pattern is valid")
});

/// Profile fields used by the stats card (`GET /users/{login}`).
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub public_repos: u32,
    pub followers: u32,
}

/// One entry of `GET /users/{login}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    pub stargazers_count: u32,
}

/// The three REST lookups acquisition needs.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn user(&self, login: &str) -> Result<GithubUser, FetchError>;

    /// First page (up to 100 entries) of the user's repositories.
    async fn repos(&self, login: &str) -> Result<Vec<GithubRepo>, FetchError>;

    /// Last-page index of the repository's one-commit-per-page history,
    /// or `None` when the response carries no usable `Link` header.
    async fn commit_pages(&self, owner: &str, repo: &str) -> Result<Option<u64>, FetchError>;
}

/// Extract the `rel="last"` page index from a `Link` header value.
pub fn parse_last_page(link: &str) -> Option<u64> {
    LAST_PAGE
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

#[derive(Clone)]
pub struct GithubClient {
    base: Arc<String>,
    token: Option<Arc<String>>,
    http: Arc<Client>,
}

impl GithubClient {
    /// REST client against `base` (normally `https://api.github.com`).
    /// The token is optional; unauthenticated requests work at a lower rate limit.
    pub fn new(base: &str, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base: Arc::new(base.trim_end_matches('/').to_string()),
            token: token.filter(|t| !t.is_empty()).map(Arc::new),
            http: Arc::new(http),
        })
    }

    /// Single GET with status checking. No retries.
    async fn get(&self, path: &str) -> Result<Response, FetchError> {
        let url = format!("{}{path}", self.base);
        log::debug!("GET {url}");

        let mut req = self
            .http
            .get(&url)
            .header(USER_AGENT, "folio-stats")
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(&**token);
        }

        let resp = req.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(resp)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let resp = self.get(path).await?;
        let url = resp.url().to_string();
        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        decode_body(url, &body)
    }
}

/// Parse a fully read response body. Only malformed JSON is a decode failure.
fn decode_body<T: serde::de::DeserializeOwned>(url: String, body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|source| FetchError::Decode { url, source })
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn user(&self, login: &str) -> Result<GithubUser, FetchError> {
        self.get_json(&format!("/users/{login}")).await
    }

    async fn repos(&self, login: &str) -> Result<Vec<GithubRepo>, FetchError> {
        self.get_json(&format!("/users/{login}/repos?per_page=100"))
            .await
    }

    async fn commit_pages(&self, owner: &str, repo: &str) -> Result<Option<u64>, FetchError> {
        let resp = self
            .get(&format!("/repos/{owner}/{repo}/commits?per_page=1"))
            .await?;

        Ok(resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_last_page))
    }
}
