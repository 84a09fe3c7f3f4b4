//! Corner Shop CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cs-cli migrate
//!
//! # Insert the demo catalog
//! cs-cli seed
//!
//! # Create an account
//! cs-cli user create -u alice -p 'correct horse' -e alice@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert a small demo catalog (skipped if products already exist)
    Seed,
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Optional contact email
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::catalog().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                email,
            } => {
                commands::user::create(&username, &password, email.as_deref()).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "cs-cli", "user", "create", "-u", "alice", "-p", "pw123456",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::User {
            action:
                UserAction::Create {
                    username, email, ..
                },
        } = cli.command
        else {
            panic!("expected user create");
        };
        assert_eq!(username, "alice");
        assert_eq!(email, None);
    }
}
