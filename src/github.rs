use crate::error::{Result, StarListsError};
use crate::models::StarredRepo;
use crate::types::ApiStarredItem;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "starred-lists-sync/1.0";
pub const PER_PAGE: usize = 100;

/// Source of raw `GET /users/{username}/starred` pages.
#[allow(async_fn_in_trait)]
pub trait StarredSource {
    async fn fetch_starred_page(&self, username: &str, page: u32) -> Result<Value>;
}

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient { client, token })
    }

    async fn make_request(&self, url: &Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.as_str())
            // star+json adds `starred_at` to every item
            .header(ACCEPT, "application/vnd.github.star+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        debug!(%url, %status, body = %error_text, "GitHub API request failed");
        Err(StarListsError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// `https://api.github.com/users/{username}/starred?per_page=100&page={page}&sort=created&direction=desc`
pub fn starred_page_url(username: &str, page: u32) -> Result<Url> {
    let mut url = Url::parse(API_BASE_URL)?;
    url.path_segments_mut()
        .map_err(|_| StarListsError::ApiError(format!("Cannot build URL from {}", API_BASE_URL)))?
        .pop_if_empty()
        .extend(["users", username, "starred"]);
    url.query_pairs_mut()
        .append_pair("per_page", &PER_PAGE.to_string())
        .append_pair("page", &page.to_string())
        .append_pair("sort", "created")
        .append_pair("direction", "desc");
    Ok(url)
}

impl StarredSource for GitHubClient {
    async fn fetch_starred_page(&self, username: &str, page: u32) -> Result<Value> {
        let url = starred_page_url(username, page)?;
        let response = self.make_request(&url).await?;
        Ok(response.json().await?)
    }
}

/// Normalizes one API page. Returns the raw item count alongside the repos so
/// pagination can compare it with the requested page size.
pub fn normalize_starred_page(payload: Value) -> Result<(usize, Vec<StarredRepo>)> {
    let Value::Array(items) = payload else {
        return Err(StarListsError::ApiError(
            "Unexpected GitHub API response format.".to_string(),
        ));
    };

    let item_count = items.len();
    let mut repos = Vec::with_capacity(item_count);
    for item in items.into_iter().filter(Value::is_object) {
        let starred: ApiStarredItem = serde_json::from_value(item).map_err(|e| {
            StarListsError::ApiError(format!("Malformed starred repository: {}", e))
        })?;
        repos.push(starred.into_starred_repo());
    }
    Ok((item_count, repos))
}

/// Fetches every starred repo, page by page, until a short or empty page.
pub async fn fetch_all_starred<S: StarredSource>(source: &S, username: &str) -> Result<Vec<StarredRepo>> {
    let mut repos = Vec::new();
    let mut page = 1;

    loop {
        let payload = source.fetch_starred_page(username, page).await?;
        let (item_count, page_repos) = normalize_starred_page(payload)?;
        if item_count == 0 {
            break;
        }

        debug!(page, count = page_repos.len(), "Fetched starred page");
        repos.extend(page_repos);

        if item_count < PER_PAGE {
            break;
        }
        page += 1;
    }

    info!(username, total = repos.len(), "Fetched starred repositories");
    Ok(repos)
}
