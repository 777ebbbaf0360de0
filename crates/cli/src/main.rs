//! Pressroom CLI - Catalog sync, database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Reconcile the local catalog against Printful
//! pressroom sync
//!
//! # Preview a reconciliation without writing anything
//! pressroom sync --dry-run
//!
//! # Run database migrations
//! pressroom migrate
//!
//! # Seed the default category set
//! pressroom categories seed
//! ```
//!
//! # Commands
//!
//! - `sync` - Run a full catalog reconciliation against Printful
//! - `migrate` - Run database migrations
//! - `categories seed` - Insert the default category set

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(author, version, about = "Pressroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full catalog reconciliation against Printful
    Sync {
        /// Compute and report changes without writing to the database
        #[arg(long)]
        dry_run: bool,

        /// Delete orphaned products without re-checking them against the API
        #[arg(long)]
        force_delete: bool,

        /// Skip the post-sync mirror verification pass
        #[arg(long)]
        skip_verification: bool,
    },
    /// Run database migrations
    Migrate,
    /// Manage catalog categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Insert the default category set (existing slugs are left alone)
    Seed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Sync {
            dry_run,
            force_delete,
            skip_verification,
        } => {
            commands::sync::run(dry_run, force_delete, skip_verification).await?;
        }
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Categories { action } => match action {
            CategoryAction::Seed => commands::seed::categories().await?,
        },
    }
    Ok(())
}
