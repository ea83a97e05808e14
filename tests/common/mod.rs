#![allow(dead_code)]

use github_star_lists::error::{Result, StarListsError};
use github_star_lists::github::StarredSource;
use github_star_lists::models::{ListEntry, StarredRepo};
use github_star_lists::web::PageSource;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;

/// In-memory GitHub web UI. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
    failing: HashMap<String, u16>,
    pub requests: RefCell<Vec<String>>,
}

impl FakePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.failing.insert(url.to_string(), status);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PageSource for FakePages {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let key = url.to_string();
        self.requests.borrow_mut().push(key.clone());

        if let Some(status) = self.failing.get(&key) {
            return Err(StarListsError::HttpStatus {
                status: *status,
                url: key,
            });
        }
        self.pages
            .get(&key)
            .cloned()
            .ok_or(StarListsError::HttpStatus { status: 404, url: key })
    }
}

/// In-memory starred API returning the given pages in order, then `[]`.
pub struct FakeStarred {
    pub pages: Vec<Value>,
    pub requested: RefCell<Vec<u32>>,
}

impl FakeStarred {
    pub fn new(pages: Vec<Value>) -> Self {
        Self {
            pages,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl StarredSource for FakeStarred {
    async fn fetch_starred_page(&self, _username: &str, page: u32) -> Result<Value> {
        self.requested.borrow_mut().push(page);
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }
}

pub fn api_repo(id: u64, full_name: &str) -> Value {
    json!({
        "id": id,
        "full_name": full_name,
        "html_url": format!("https://github.com/{}", full_name),
        "description": null,
        "stargazers_count": 10,
        "forks_count": 2,
        "language": "Rust",
        "archived": false,
        "fork": false,
        "topics": ["cli"],
        "updated_at": "2024-05-01T12:00:00Z"
    })
}

pub fn starred_item(id: u64, full_name: &str) -> Value {
    json!({
        "starred_at": "2024-06-01T08:30:00Z",
        "repo": api_repo(id, full_name),
    })
}

pub fn starred_repo(id: u64, full_name: &str) -> StarredRepo {
    StarredRepo {
        id,
        full_name: full_name.to_string(),
        html_url: format!("https://github.com/{}", full_name),
        description: None,
        stargazers_count: 0,
        forks_count: 0,
        language: None,
        archived: false,
        fork: false,
        topics: Vec::new(),
        updated_at: None,
        starred_at: None,
    }
}

pub fn list_entry(slug: &str, name: &str, repos: &[&str]) -> ListEntry {
    ListEntry {
        slug: slug.to_string(),
        name: name.to_string(),
        description: String::new(),
        repos: repos.iter().map(|repo| repo.to_string()).collect(),
        extra: Map::new(),
        original: None,
    }
}

/// A page of anchors, each `(href, text)`.
pub fn html_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!("<a href=\"{}\">{}</a>\n", href, text))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}
