use crate::models::StarredRepo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// GitHub API response structures

/// One item of `GET /users/{username}/starred`. With the `star+json` media type
/// the repo is wrapped together with its `starred_at` timestamp.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiStarredItem {
    Starred {
        starred_at: Option<DateTime<Utc>>,
        repo: ApiRepo,
    },
    Plain(ApiRepo),
}

#[derive(Debug, Deserialize)]
pub struct ApiRepo {
    pub id: u64,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub fork: Option<bool>,
    #[serde(default, deserialize_with = "topic_names")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn topic_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(topic) => topic,
            other => other.to_string(),
        })
        .collect())
}

impl ApiStarredItem {
    pub fn into_starred_repo(self) -> StarredRepo {
        let (repo, starred_at) = match self {
            ApiStarredItem::Starred { starred_at, repo } => (repo, starred_at),
            ApiStarredItem::Plain(repo) => (repo, None),
        };

        StarredRepo {
            id: repo.id,
            full_name: repo.full_name,
            html_url: repo.html_url,
            description: repo.description,
            stargazers_count: repo.stargazers_count.unwrap_or(0),
            forks_count: repo.forks_count.unwrap_or(0),
            language: repo.language,
            archived: repo.archived.unwrap_or(false),
            fork: repo.fork.unwrap_or(false),
            topics: repo.topics,
            updated_at: repo.updated_at,
            starred_at,
        }
    }
}
