//! Scraping rules for the GitHub stars UI.
//!
//! Everything here is a pure function over already-parsed anchors, so the
//! importer can be exercised against canned HTML without touching the network.

use crate::error::Result;
use crate::html::Anchor;
use crate::models::ListLink;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use url::Url;

pub const GITHUB_ORIGIN: &str = "https://github.com";
const GITHUB_HOST: &str = "github.com";

/// First path segments that are GitHub namespaces rather than user accounts.
const BLOCKED_OWNERS: &[&str] = &[
    "about",
    "account",
    "apps",
    "blog",
    "collections",
    "contact",
    "customer-stories",
    "docs",
    "enterprise",
    "events",
    "explore",
    "features",
    "github",
    "home",
    "issues",
    "login",
    "logout",
    "marketplace",
    "new",
    "notifications",
    "orgs",
    "organizations",
    "pricing",
    "pulls",
    "search",
    "security",
    "sessions",
    "settings",
    "signup",
    "site",
    "solutions",
    "resources",
    "sponsors",
    "stars",
    "support",
    "team",
    "topics",
    "trending",
    "users",
    "why-github",
];

static REPO_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap());
static NON_SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static REPO_COUNT_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+\d+\s+repositor(?:y|ies)\s*$").unwrap());
static TRAILING_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(?\d+\)?\s*$").unwrap());

/// Lowercases and joins alphanumeric runs with single dashes.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    NON_SLUG_REGEX
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips repo-count annotations from anchor text ("Cool Stuff 12 repositories").
pub fn clean_list_name(raw_name: &str, fallback: &str) -> String {
    let fallback_name = fallback.replace('-', " ");

    let mut name = collapse_whitespace(raw_name);
    if name.is_empty() {
        name = fallback_name.clone();
    }

    let name = REPO_COUNT_SUFFIX_REGEX.replace(&name, "");
    let name = TRAILING_COUNT_REGEX.replace(name.trim(), "");
    let name = name.trim();

    if name.is_empty() {
        fallback_name
    } else {
        name.to_string()
    }
}

fn is_github(url: &Url) -> bool {
    url.host_str() == Some(GITHUB_HOST) && url.port().is_none()
}

/// `https://github.com/{username}?tab=stars`
pub fn stars_page_url(username: &str) -> Result<Url> {
    let mut url = Url::parse(GITHUB_ORIGIN)?;
    url.set_path(&format!("/{username}"));
    url.set_query(Some("tab=stars"));
    Ok(url)
}

/// Resolves `href` against `base` and, if it points at one of `username`'s
/// star lists, returns the canonical list URL and the list token.
///
/// Two URL shapes are recognized: `/{username}?tab=stars&list={token}` and
/// `/stars/{username}/lists/{token}`.
pub fn normalize_list_url(username: &str, href: &str, base: &Url) -> Option<(String, String)> {
    let url = base.join(href).ok()?;
    if !is_github(&url) {
        return None;
    }

    let path = url.path().trim_end_matches('/');
    let mut normalized = Url::parse(GITHUB_ORIGIN).ok()?;
    normalized.set_path(path);

    let is_stars_tab = path == format!("/{username}")
        && url.query_pairs().any(|(key, value)| key == "tab" && value == "stars");

    let token = if is_stars_tab {
        let token = url
            .query_pairs()
            .find(|(key, value)| key == "list" && !value.is_empty())
            .map(|(_, value)| value.into_owned())?;
        normalized
            .query_pairs_mut()
            .append_pair("tab", "stars")
            .append_pair("list", &token);
        token
    } else {
        let prefix = format!("/stars/{username}/lists/");
        let token = path.strip_prefix(prefix.as_str())?;
        if token.is_empty() || token.contains('/') {
            return None;
        }
        token.to_string()
    };

    Some((normalized.to_string(), token))
}

/// Finds the star lists linked from the stars page, one per canonical URL,
/// sorted case-insensitively by name.
pub fn extract_list_links(username: &str, stars_page_url: &Url, anchors: &[Anchor]) -> Vec<ListLink> {
    let mut order: Vec<String> = Vec::new();
    let mut by_url: HashMap<String, ListLink> = HashMap::new();

    for anchor in anchors {
        let href = anchor.href.trim();
        if href.is_empty() {
            continue;
        }
        let Some((url, token)) = normalize_list_url(username, href, stars_page_url) else {
            continue;
        };

        let fallback = token.replace(['-', '_'], " ");
        let name = clean_list_name(&anchor.text, &fallback);
        let slug = [slugify(&token), slugify(&name)]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_else(|| "list".to_string());

        let link = ListLink {
            name,
            slug,
            url: url.clone(),
        };
        if by_url.insert(url.clone(), link).is_none() {
            order.push(url);
        }
    }

    let mut links: Vec<ListLink> = order
        .into_iter()
        .filter_map(|url| by_url.remove(&url))
        .collect();
    links.sort_by_key(|link| link.name.to_lowercase());
    links
}

/// Collects `owner/repo` names linked from a list page.
pub fn extract_repo_full_names(anchors: &[Anchor], base: &Url) -> HashSet<String> {
    let mut repos = HashSet::new();

    for anchor in anchors {
        let href = anchor.href.trim();
        if href.is_empty() {
            continue;
        }
        let Ok(url) = base.join(href) else {
            continue;
        };
        if !is_github(&url) {
            continue;
        }
        let has_query = url.query().is_some_and(|query| !query.is_empty());
        let has_fragment = url.fragment().is_some_and(|fragment| !fragment.is_empty());
        if has_query || has_fragment {
            continue;
        }

        let Some(captures) = REPO_PATH_REGEX.captures(url.path()) else {
            continue;
        };
        let owner = &captures[1];
        let repo = &captures[2];
        if BLOCKED_OWNERS.contains(&owner.to_lowercase().as_str()) {
            continue;
        }
        repos.insert(format!("{owner}/{repo}"));
    }

    repos
}

/// Finds the pagination "next" link, by `rel` or by link text.
pub fn find_next_page_url(anchors: &[Anchor], current_url: &Url) -> Option<Url> {
    for anchor in anchors {
        let href = anchor.href.trim();
        if href.is_empty() {
            continue;
        }

        let rel = anchor.attr("rel").unwrap_or_default().to_lowercase();
        let text = anchor.text.trim().to_lowercase();
        let is_next = rel.split_whitespace().any(|token| token == "next") || text == "next";
        if !is_next {
            continue;
        }

        let Ok(next) = current_url.join(href) else {
            continue;
        };
        if !is_github(&next) {
            continue;
        }

        let Ok(mut normalized) = Url::parse(GITHUB_ORIGIN) else {
            continue;
        };
        normalized.set_path(next.path());
        normalized.set_query(next.query());
        return Some(normalized);
    }
    None
}

/// GitHub serves its login form instead of private stars when unauthenticated.
pub fn is_sign_in_page(html: &str) -> bool {
    html.contains("Sign in to GitHub") && html.contains("/login")
}
