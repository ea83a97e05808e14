use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_MAPPING_PATH: &str = "data/starred-lists.json";
pub const DEFAULT_OUTPUT_PATH: &str = "public/data/starred-groups.json";

#[derive(Parser, Debug)]
#[command(name = "import-starred-lists")]
#[command(about = "Import GitHub stars list assignments from the GitHub web UI")]
#[command(version = "0.1.0")]
pub struct ImportCli {
    /// Path to the mapping JSON file
    #[arg(long, default_value = DEFAULT_MAPPING_PATH)]
    pub mapping: PathBuf,

    /// Override the GitHub username from the mapping file
    #[arg(long)]
    pub username: Option<String>,

    /// Environment variable holding the GitHub cookie header value
    #[arg(long, default_value = "GITHUB_COOKIE")]
    pub cookie_env: String,

    /// Max pagination pages per list
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Keep local mapping lists that are not present in the GitHub UI
    #[arg(long)]
    pub preserve_unmatched: bool,

    /// Print what would change without writing the mapping file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
#[command(name = "sync-starred-lists")]
#[command(about = "Fetch GitHub stars and generate grouped JSON for the website")]
#[command(version = "0.1.0")]
pub struct SyncCli {
    /// Path to the mapping JSON file
    #[arg(long, default_value = DEFAULT_MAPPING_PATH)]
    pub mapping: PathBuf,

    /// Path to the generated grouped JSON
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Override the GitHub username from the mapping file
    #[arg(long)]
    pub username: Option<String>,

    /// Environment variable holding a GitHub token
    #[arg(long, default_value = "GITHUB_TOKEN")]
    pub token_env: String,
}

/// Reads a secret from the environment variable named `var`. Empty values count as unset.
pub fn secret_from_env(var: &str) -> Option<String> {
    if var.is_empty() {
        return None;
    }
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// Logs go to stderr so stdout stays readable; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
