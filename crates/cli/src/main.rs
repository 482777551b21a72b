//! Exship CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! exs-cli migrate
//!
//! # Register (or refresh) a user record
//! exs-cli user add -e ops@example.com -n "Ops Team" -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user add` - Register a user record mirrored from the identity provider

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "exs-cli")]
#[command(author, version, about = "Exship CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user records
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register or refresh a user record
    Add {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// User display name
        #[arg(short, long)]
        name: String,

        /// User role (`admin` or `standard`)
        #[arg(short, long, default_value = "standard")]
        role: String,

        /// Identity-provider user id; generated when omitted
        #[arg(short, long)]
        id: Option<String>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Add {
                email,
                name,
                role,
                id,
            } => {
                commands::user::add(&email, &name, &role, id.as_deref()).await?;
            }
        },
    }
    Ok(())
}
