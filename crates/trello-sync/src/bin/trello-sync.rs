//! CI entrypoint for Trello card synchronization.
//!
//! One invocation per triggering GitHub event; the action selector decides
//! which workflow runs.

// The ::error:: workflow command must go to stdout for the CI runner
#![allow(clippy::print_stdout)]

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trello_sync::{event, workflows, Config, TrelloClient};

/// Upper bound for a whole invocation; individual requests time out earlier.
const OVERALL_DEADLINE: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(name = "trello-sync")]
#[command(about = "Synchronize GitHub issue and pull request events with Trello cards")]
#[command(version)]
struct Cli {
    /// Workflow to run for the current event
    #[arg(long, value_enum, env = "TRELLO_ACTION")]
    action: Action,
}

/// Action selector; values match the workflow step configuration.
///
/// An unrecognized value is rejected at parse time with the valid set, not
/// silently ignored.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum Action {
    /// Create a card from the opened issue
    CreateCardWhenIssueOpened,
    /// Move the matching card and attach the pull request URL
    MoveCardWhenPullRequestOpened,
    /// Move the matching card
    MoveCardWhenPullRequestClosed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let outcome = tokio::time::timeout(OVERALL_DEADLINE, run(cli.action))
        .await
        .map_err(|_| {
            anyhow!(
                "synchronization did not finish within {}s",
                OVERALL_DEADLINE.as_secs()
            )
        })
        .and_then(|result| result);

    if let Err(err) = outcome {
        error!(error = %err, "Synchronization failed");
        // The ::error:: workflow command is what the CI runner surfaces as
        // the run's failure annotation.
        println!("::error::{err:#}");
        std::process::exit(1);
    }
}

async fn run(action: Action) -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let client = TrelloClient::new(&config.api_key, &config.api_token)
        .context("Failed to create Trello client")?;

    match action {
        Action::CreateCardWhenIssueOpened => {
            let issue = event::issue_opened().context("Failed to read issue event")?;
            info!(issue_number = issue.number, "Creating card for opened issue");
            workflows::create_card_for_issue(&client, &config, &issue).await?;
        }
        Action::MoveCardWhenPullRequestOpened => {
            let pull_request =
                event::pull_request().context("Failed to read pull request event")?;
            info!("Moving card for opened pull request");
            workflows::move_card_for_opened_pull_request(&client, &config, &pull_request).await?;
        }
        Action::MoveCardWhenPullRequestClosed => {
            let pull_request =
                event::pull_request().context("Failed to read pull request event")?;
            info!("Moving card for closed pull request");
            workflows::move_card_for_closed_pull_request(&client, &config, &pull_request).await?;
        }
    }

    Ok(())
}
