//! Spense CLI - finance dashboard client
//!
//! Usage:
//!   spense dashboard                    Show stat cards and charts
//!   spense transactions list --page 0   Browse transactions
//!   spense transactions delete 42       Delete (with confirmation)
//!   spense export --from ... --to ...   Download a CSV
//!   spense import --file statement.csv  Upload a CSV

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Dashboard { from, to } => {
            commands::cmd_dashboard(&config, from.as_deref(), to.as_deref()).await
        }
        Commands::Transactions { action } => match action {
            None => commands::cmd_transactions_list(&config, 0, None, None).await,
            Some(TransactionsAction::List { page, from, to }) => {
                commands::cmd_transactions_list(&config, page, from.as_deref(), to.as_deref())
                    .await
            }
            Some(TransactionsAction::Add {
                amount,
                r#type,
                date,
                description,
                category,
            }) => {
                commands::cmd_transactions_add(
                    &config,
                    amount,
                    &r#type,
                    date.as_deref(),
                    description,
                    category,
                )
                .await
            }
            Some(TransactionsAction::Delete { id, yes }) => {
                commands::cmd_transactions_delete(&config, id, yes).await
            }
            Some(TransactionsAction::SetCategory { id, name, from, to }) => {
                commands::cmd_transactions_set_category(
                    &config,
                    id,
                    &name,
                    from.as_deref(),
                    to.as_deref(),
                )
                .await
            }
        },
        Commands::Categories { r#type } => {
            commands::cmd_categories(&config, r#type.as_deref()).await
        }
        Commands::Export { from, to, output } => {
            commands::cmd_export(&config, &from, &to, &output).await
        }
        Commands::Import { file } => commands::cmd_import(&config, &file).await,
    }
}
