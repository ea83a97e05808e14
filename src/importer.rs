use crate::discovery::{extract_list_links, is_sign_in_page, stars_page_url};
use crate::error::{Result, StarListsError};
use crate::html::parse_anchors;
use crate::models::{ListEntry, Mapping};
use crate::web::{fetch_list_repos, PageSource};
use serde_json::Map;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub max_pages: u32,
    pub preserve_unmatched: bool,
    /// Name of the cookie variable, quoted back in the sign-in error.
    pub cookie_env: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedList {
    pub name: String,
    pub repo_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedList {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub mapping: Mapping,
    pub imported: Vec<ImportedList>,
    pub failed: Vec<FailedList>,
}

/// Merges freshly scraped lists into the existing ones, keyed by slug.
///
/// Scraped entries win on `name` and `repos`; `description` and unmanaged
/// keys always come from the existing entry. Existing lists missing from the
/// scrape are dropped, or appended unchanged when `preserve_unmatched` is set.
pub fn merge_lists(
    existing: &[ListEntry],
    scraped: Vec<ListEntry>,
    preserve_unmatched: bool,
) -> Vec<ListEntry> {
    let mut existing_order: Vec<&str> = Vec::new();
    let mut existing_by_slug: HashMap<&str, &ListEntry> = HashMap::new();
    for entry in existing {
        let slug = entry.slug.trim();
        if slug.is_empty() {
            continue;
        }
        if existing_by_slug.insert(slug, entry).is_none() {
            existing_order.push(slug);
        }
    }

    let mut seen_slugs: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(scraped.len());
    for entry in scraped {
        if !seen_slugs.insert(entry.slug.clone()) {
            warn!(slug = %entry.slug, name = %entry.name, "Scraped list repeats an earlier slug, ignoring it");
            continue;
        }

        let (description, extra) = match existing_by_slug.get(entry.slug.as_str()) {
            Some(current) => (current.description.clone(), current.extra.clone()),
            None => (String::new(), Map::new()),
        };
        merged.push(ListEntry {
            description,
            extra,
            ..entry
        });
    }

    if preserve_unmatched {
        for slug in existing_order {
            if seen_slugs.contains(slug) {
                continue;
            }
            debug!(slug, "Preserving list not present in GitHub UI");
            if let Some(entry) = existing_by_slug.get(slug) {
                merged.push((*entry).clone());
            }
        }
    }

    merged
}

/// Scrapes `username`'s star lists through `source` and folds them into `mapping`.
///
/// A list whose pages fail to load is recorded in [`ImportOutcome::failed`] and
/// skipped; the run only fails when the stars page itself cannot be used or
/// when no list could be imported at all.
pub async fn import_lists<S: PageSource>(
    source: &S,
    mut mapping: Mapping,
    username: &str,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    let stars_url = stars_page_url(username)?;
    info!(%stars_url, "Fetching stars page");

    let stars_html = source.fetch_page(&stars_url).await?;
    if is_sign_in_page(&stars_html) {
        return Err(StarListsError::SignInRequired(options.cookie_env.clone()));
    }

    let list_links = extract_list_links(username, &stars_url, &parse_anchors(&stars_html));
    if list_links.is_empty() {
        return Err(StarListsError::NoListsFound);
    }
    info!(count = list_links.len(), "Discovered star lists");

    let mut scraped = Vec::with_capacity(list_links.len());
    let mut imported = Vec::new();
    let mut failed = Vec::new();

    for link in list_links {
        let list_url = Url::parse(&link.url)?;
        match fetch_list_repos(source, &list_url, options.max_pages).await {
            Ok(repos) => {
                info!(list = %link.name, repos = repos.len(), "Imported list");
                imported.push(ImportedList {
                    name: link.name.clone(),
                    repo_count: repos.len(),
                });
                scraped.push(ListEntry {
                    slug: link.slug,
                    name: link.name,
                    description: String::new(),
                    repos,
                    extra: Map::new(),
                    original: None,
                });
            }
            Err(e) if e.is_transport() => {
                warn!(list = %link.name, error = %e, "Failed to import list");
                failed.push(FailedList {
                    name: link.name,
                    reason: e.to_string(),
                });
            }
            Err(StarListsError::SignInPage(url)) => {
                warn!(list = %link.name, %url, "List page requires sign-in");
                return Err(StarListsError::SignInRequired(options.cookie_env.clone()));
            }
            Err(e) => return Err(e),
        }
    }

    if scraped.is_empty() {
        return Err(StarListsError::NoListsImported);
    }

    mapping.lists = Some(merge_lists(
        mapping.lists_or_empty(),
        scraped,
        options.preserve_unmatched,
    ));
    mapping.username = Some(username.to_string());

    Ok(ImportOutcome {
        mapping,
        imported,
        failed,
    })
}
