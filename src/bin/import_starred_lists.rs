use anyhow::Context;
use clap::Parser;
use colored::*;
use github_star_lists::cli::{init_tracing, secret_from_env, ImportCli};
use github_star_lists::importer::{import_lists, ImportOptions};
use github_star_lists::storage::{read_mapping, write_json};
use github_star_lists::web::GitHubWebClient;
use std::process::ExitCode;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    init_tracing();

    let cli = ImportCli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: ImportCli) -> anyhow::Result<()> {
    let mapping = read_mapping(&cli.mapping)?;
    let username = mapping.resolve_username(cli.username.as_deref())?;

    let client = GitHubWebClient::new(secret_from_env(&cli.cookie_env))
        .context("Failed to build HTTP client")?;
    if !client.has_cookie() {
        warn!(cookie_env = %cli.cookie_env, "No cookie set, only public lists will be visible");
    }

    let options = ImportOptions {
        max_pages: cli.max_pages,
        preserve_unmatched: cli.preserve_unmatched,
        cookie_env: cli.cookie_env.clone(),
    };
    let outcome = import_lists(&client, mapping, &username, &options).await?;

    for list in &outcome.imported {
        println!(
            "Imported {} repos from list '{}'.",
            list.repo_count.to_string().bold(),
            list.name
        );
    }

    if cli.dry_run {
        println!(
            "{}",
            format!(
                "Dry run complete. Would write {} list entries to {}.",
                outcome.mapping.lists_or_empty().len(),
                cli.mapping.display()
            )
            .yellow()
        );
    } else {
        write_json(&cli.mapping, &outcome.mapping)?;
        println!("✅ Updated mapping file: {}", cli.mapping.display());
    }

    if !outcome.failed.is_empty() {
        for failure in &outcome.failed {
            eprintln!("{} '{}' ({})", "Warning: failed to import list".yellow(), failure.name, failure.reason);
        }
        eprintln!(
            "{}",
            format!("Skipped {} list(s) due to fetch errors.", outcome.failed.len()).yellow()
        );
    }

    Ok(())
}
