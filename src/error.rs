use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarListsError {
    #[error("Mapping file not found: {0}")]
    MappingNotFound(String),

    #[error("Invalid mapping file: {0}")]
    InvalidMapping(String),

    #[error("GitHub username is required in mapping file or --username.")]
    MissingUsername,

    #[error("GitHub returned a sign-in page. If your stars are private, set {0} and retry.")]
    SignInRequired(String),

    #[error("GitHub returned a sign-in page for {0}")]
    SignInPage(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("No GitHub star lists found in the stars page UI. Ensure lists exist and are visible.")]
    NoListsFound,

    #[error("No lists could be imported from GitHub UI.")]
    NoListsImported,

    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl StarListsError {
    /// Failures scoped to a single remote resource.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StarListsError::HttpStatus { .. } | StarListsError::NetworkError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StarListsError>;
