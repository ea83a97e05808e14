use crate::error::Result;
use crate::models::{Dataset, Group, Mapping, StarredRepo, UnlistedConfig};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

pub const DEFAULT_UNLISTED_SLUG: &str = "to-classify";
pub const DEFAULT_UNLISTED_NAME: &str = "To Classify";
pub const DEFAULT_UNLISTED_DESCRIPTION: &str = "New stars not assigned to a list yet.";

/// Result of grouping: the artifact plus any non-fatal mapping problems.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub dataset: Dataset,
    pub warnings: Vec<String>,
}

impl BuildOutcome {
    /// The catch-all group, always emitted last.
    pub fn unlisted(&self) -> Option<&Group> {
        self.dataset.groups.last()
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Empty catch-all group, with defaults filled in for blank fields.
pub fn unlisted_group(config: Option<&UnlistedConfig>) -> Group {
    let config = config.cloned().unwrap_or_default();
    Group {
        slug: or_default(&config.slug, DEFAULT_UNLISTED_SLUG),
        name: or_default(&config.name, DEFAULT_UNLISTED_NAME),
        description: or_default(&config.description, DEFAULT_UNLISTED_DESCRIPTION),
        repos: Vec::new(),
    }
}

/// Partitions `starred` into one group per configured list plus the unlisted group.
///
/// A repo lands in every list that names it (matched case-insensitively on
/// `full_name`), in mapping order, and in the unlisted group only when no list
/// names it. Lists with a blank slug or name are skipped; a slug seen before, or
/// one equal to the unlisted slug, is reported as a warning and ignored along
/// with its repos.
pub fn build_grouped_dataset(
    mapping: &Mapping,
    starred: &[StarredRepo],
    generated_at: DateTime<Utc>,
) -> Result<BuildOutcome> {
    let username = mapping.resolve_username(None)?;
    let configured = mapping.configured_lists()?;
    let unlisted = unlisted_group(mapping.unlisted.as_ref());

    let mut groups: Vec<Group> = Vec::with_capacity(configured.len() + 1);
    let mut seen_slugs: HashSet<String> = HashSet::new();
    // normalized full name -> positions in `groups`, ordered as declared
    let mut repo_index: HashMap<String, BTreeSet<usize>> = HashMap::new();
    let mut warnings = Vec::new();

    for entry in configured {
        let slug = entry.slug.trim();
        let name = entry.name.trim();
        if slug.is_empty() || name.is_empty() {
            debug!(slug, name, "Skipping list entry without slug or name");
            continue;
        }
        if slug == unlisted.slug {
            warnings.push(format!(
                "List slug '{}' is reserved for unlisted repositories.",
                slug
            ));
            continue;
        }
        if !seen_slugs.insert(slug.to_string()) {
            warnings.push(format!("Duplicate list slug '{}' in mapping file.", slug));
            continue;
        }

        let position = groups.len();
        groups.push(Group {
            slug: slug.to_string(),
            name: name.to_string(),
            description: entry.description.clone(),
            repos: Vec::new(),
        });

        for repo_name in &entry.repos {
            let key = repo_name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            repo_index.entry(key).or_default().insert(position);
        }
    }

    let unlisted_position = groups.len();
    groups.push(unlisted);

    for repo in starred {
        let key = repo.full_name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        match repo_index.get(&key) {
            Some(positions) => {
                for &position in positions {
                    groups[position].repos.push(repo.clone());
                }
            }
            None => groups[unlisted_position].repos.push(repo.clone()),
        }
    }

    let dataset = Dataset {
        username,
        generated_at,
        total_repos: starred.len(),
        groups,
    };
    Ok(BuildOutcome { dataset, warnings })
}
