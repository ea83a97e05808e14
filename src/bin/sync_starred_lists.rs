use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use colored::*;
use github_star_lists::cli::{init_tracing, secret_from_env, SyncCli};
use github_star_lists::dataset::build_grouped_dataset;
use github_star_lists::github::{fetch_all_starred, GitHubClient};
use github_star_lists::storage::{read_mapping, write_json};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    init_tracing();

    let cli = SyncCli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: SyncCli) -> anyhow::Result<()> {
    let mut mapping = read_mapping(&cli.mapping)?;
    let username = mapping.resolve_username(cli.username.as_deref())?;
    mapping.username = Some(username.clone());

    let client = GitHubClient::new(secret_from_env(&cli.token_env))
        .context("Failed to build HTTP client")?;

    let starred = fetch_all_starred(&client, &username)
        .await
        .context("Failed to sync stars")?;
    let outcome = build_grouped_dataset(&mapping, &starred, Utc::now())
        .context("Failed to sync stars")?;

    write_json(&cli.output, &outcome.dataset)?;

    println!(
        "Fetched {} starred repositories for {}.",
        starred.len().to_string().bold(),
        username
    );
    println!("✅ Wrote grouped dataset to {}.", cli.output.display());

    if let Some(unlisted) = outcome.unlisted() {
        if !unlisted.repos.is_empty() {
            println!(
                "{}",
                format!("{} repositories are still unassigned.", unlisted.repos.len()).yellow()
            );
        }
    }

    for warning in &outcome.warnings {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    Ok(())
}
