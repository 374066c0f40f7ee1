//! Usuba CLI - operator tools for the menu site.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table
//! usuba-cli migrate
//!
//! # Check every menu price can be ordered
//! usuba-cli menu check --dir crates/storefront/content
//!
//! # Print the waiter summary for an exported cart
//! usuba-cli summary cart.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session table
//! - `menu check` - Audit menu prices
//! - `summary` - Waiter summary of a cart blob

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "usuba-cli")]
#[command(author, version, about = "Usuba CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session table
    Migrate,
    /// Inspect menu content
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Print the waiter summary for an exported cart blob
    Summary {
        /// Path to the cart JSON
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// Report items whose price can't be added to the cart
    Check {
        /// Content directory holding `menus/`
        #[arg(short, long, default_value = "crates/storefront/content")]
        dir: PathBuf,
    },
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Menu { action } => match action {
            MenuAction::Check { dir } => commands::menu::check(&dir)?,
        },
        Commands::Summary { file } => commands::summary::print(&file)?,
    }
    Ok(())
}
