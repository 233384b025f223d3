//! Pantry CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the schema and the session table
//! pantry-cli migrate
//!
//! # Insert the default accounts and sample products into empty tables
//! pantry-cli seed
//!
//! # Create a user
//! pantry-cli user create -u alice -p 'correct horse'
//! ```
//!
//! The database is chosen the same way as for the server: `PANTRY_DATABASE_URL`,
//! then `DATABASE_URL`, then `sqlite://pantry.db`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed default users and sample products into empty tables
    Seed,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (hashed before it is stored)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantry_cli=info,pantry_web=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
        },
    }
    Ok(())
}
