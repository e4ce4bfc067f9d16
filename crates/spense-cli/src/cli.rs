//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spense - dashboard client for your finance API
#[derive(Parser)]
#[command(name = "spense")]
#[command(about = "Income/expense dashboard over the Spense REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides config file and SPENSE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show stat cards and charts for a date range
    Dashboard {
        /// Start date (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
    },

    /// Browse and mutate transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// List the category taxonomy
    Categories {
        /// Restrict to one type: income or expense
        #[arg(long, value_name = "TYPE")]
        r#type: Option<String>,
    },

    /// Export transactions in a date range to a CSV file
    Export {
        /// Start date (YYYY-MM-DD), required
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD), required
        #[arg(long)]
        to: String,

        /// Output file
        #[arg(short, long, default_value = "transactions.csv")]
        output: PathBuf,
    },

    /// Import transactions from a CSV file
    Import {
        /// CSV file to upload
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List one page of transactions
    List {
        /// Page to show (zero-based)
        #[arg(short, long, default_value = "0")]
        page: u32,

        /// Start date (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
    },

    /// Add a transaction
    Add {
        /// Amount (non-negative; sign comes from the type)
        #[arg(short, long)]
        amount: f64,

        /// Transaction type: income or expense
        #[arg(short = 't', long)]
        r#type: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Category name (must match the type)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Change a transaction's category
    SetCategory {
        /// Transaction id
        id: i64,

        /// New category name (must match the transaction's type)
        name: String,

        /// Start date (YYYY-MM-DD) of the range to search
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD) of the range to search
        #[arg(long)]
        to: Option<String>,
    },
}
