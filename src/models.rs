use crate::error::{Result, StarListsError};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Local mapping file: the account whose stars are tracked and the curated lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    #[serde(
        default,
        deserialize_with = "unlisted_config",
        skip_serializing_if = "Option::is_none"
    )]
    pub unlisted: Option<UnlistedConfig>,
    /// `None` when the file has no `lists` array (missing or null).
    #[serde(
        default,
        deserialize_with = "list_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub lists: Option<Vec<ListEntry>>,
    /// Keys this tool does not manage, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mapping {
    /// Picks the username from `override_name` or the mapping, trimmed.
    pub fn resolve_username(&self, override_name: Option<&str>) -> Result<String> {
        override_name
            .or(self.username.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or(StarListsError::MissingUsername)
    }

    /// The configured lists; the dataset builder refuses a mapping without them.
    pub fn configured_lists(&self) -> Result<&[ListEntry]> {
        self.lists.as_deref().ok_or_else(|| {
            StarListsError::InvalidMapping("Mapping file must define 'lists' as an array.".to_string())
        })
    }

    /// The lists as far as the importer is concerned: a missing array is empty.
    pub fn lists_or_empty(&self) -> &[ListEntry] {
        self.lists.as_deref().unwrap_or_default()
    }
}

/// A named GitHub stars list. `slug` is its identity across re-imports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "repo_names")]
    pub repos: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The entry exactly as read from the file. Written back verbatim when set,
    /// so only leave it on entries whose fields were not changed.
    #[serde(skip)]
    pub original: Option<Value>,
}

#[derive(Serialize)]
struct ListEntryFields<'a> {
    slug: &'a str,
    name: &'a str,
    description: &'a str,
    repos: &'a [String],
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl Serialize for ListEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some(original) = &self.original {
            return original.serialize(serializer);
        }
        ListEntryFields {
            slug: &self.slug,
            name: &self.name,
            description: &self.description,
            repos: &self.repos,
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

/// Catch-all bucket for starred repos that belong to no list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UnlistedConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The object exactly as read from the file, written back verbatim.
    #[serde(skip)]
    pub original: Option<Value>,
}

#[derive(Serialize)]
struct UnlistedFields<'a> {
    slug: &'a str,
    name: &'a str,
    description: &'a str,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl Serialize for UnlistedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some(original) = &self.original {
            return original.serialize(serializer);
        }
        UnlistedFields {
            slug: &self.slug,
            name: &self.name,
            description: &self.description,
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

/// A starred repository, normalized from the REST API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarredRepo {
    pub id: u64,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub archived: bool,
    pub fork: bool,
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub starred_at: Option<DateTime<Utc>>,
}

/// Published artifact consumed by the website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub username: String,
    pub generated_at: DateTime<Utc>,
    pub total_repos: usize,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub repos: Vec<StarredRepo>,
}

/// A list discovered on the stars page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLink {
    pub name: String,
    pub slug: String,
    pub url: String,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn repo_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn unlisted_config<'de, D>(deserializer: D) -> std::result::Result<Option<UnlistedConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value @ Value::Object(_)) => {
            let mut config: UnlistedConfig =
                serde_json::from_value(value.clone()).map_err(D::Error::custom)?;
            config.original = Some(value);
            Ok(Some(config))
        }
        Some(_) => Err(D::Error::custom("'unlisted' must be an object when provided")),
    }
}

fn list_entries<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<ListEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(D::Error::custom("'lists' must be an array")),
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, "Skipping malformed list entry (not an object)");
            continue;
        }
        let mut entry: ListEntry = serde_json::from_value(item.clone()).map_err(D::Error::custom)?;
        entry.original = Some(item);
        entries.push(entry);
    }
    Ok(Some(entries))
}
