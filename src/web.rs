use crate::discovery::{extract_repo_full_names, find_next_page_url, is_sign_in_page};
use crate::error::{Result, StarListsError};
use crate::html::parse_anchors;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "starred-lists-ui-import/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can hand back the HTML of a GitHub page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, url: &Url) -> Result<String>;
}

/// Fetches GitHub web UI pages, optionally as a signed-in user.
pub struct GitHubWebClient {
    client: Client,
    cookie: Option<String>,
}

impl GitHubWebClient {
    pub fn new(cookie: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(GitHubWebClient { client, cookie })
    }

    pub fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }
}

impl PageSource for GitHubWebClient {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!(%url, "Fetching page");

        let mut request = self
            .client
            .get(url.as_str())
            .header(ACCEPT, "text/html,application/xhtml+xml");
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StarListsError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Walks a list's pages and returns the repos found, deduplicated and sorted
/// case-insensitively.
///
/// Stops after `max_pages` pages, when there is no next link, or when the next
/// link points at a page that was already visited. A page that turns out to be
/// the sign-in form fails with [`StarListsError::SignInPage`].
pub async fn fetch_list_repos<S: PageSource>(
    source: &S,
    list_url: &Url,
    max_pages: u32,
) -> Result<Vec<String>> {
    let mut repos: HashSet<String> = HashSet::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut current_url = Some(list_url.clone());
    let mut page_count = 0;

    while let Some(url) = current_url.take() {
        if page_count >= max_pages {
            debug!(%list_url, max_pages, "Page limit reached");
            break;
        }
        if !seen_urls.insert(url.to_string()) {
            debug!(%url, "Next page already visited");
            break;
        }

        let html = source.fetch_page(&url).await?;
        if is_sign_in_page(&html) {
            return Err(StarListsError::SignInPage(url.to_string()));
        }
        let anchors = parse_anchors(&html);
        repos.extend(extract_repo_full_names(&anchors, &url));
        current_url = find_next_page_url(&anchors, &url);
        page_count += 1;
    }

    let mut repos: Vec<String> = repos.into_iter().collect();
    repos.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    Ok(repos)
}
