//! Shop CLI - database migrations, catalog seeding and admin accounts.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (fails on error)
//! shop-cli migrate
//!
//! # Run migrations if a database is configured; never fails
//! shop-cli check-and-migrate
//!
//! # Load catalog, blog and delivery prices from YAML
//! shop-cli seed seed/catalog.yaml --clear
//!
//! # Create or promote an admin account
//! shop-cli admin create -e admin@example.com -p 'long-password' --first-name Ani
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run migrations when `DATABASE_URL` is set; warn instead of failing
    CheckAndMigrate,
    /// Seed the catalog, blog and delivery prices from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,

        /// Delete existing catalog, blog and delivery data first
        #[arg(long)]
        clear: bool,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin user, or promote an existing user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

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
        Commands::CheckAndMigrate => commands::migrate::check_and_migrate().await,
        Commands::Seed { file, clear } => commands::seed::run(&file, clear).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                commands::admin::create_user(
                    &email,
                    &password,
                    first_name.as_deref(),
                    last_name.as_deref(),
                )
                .await?;
            }
        },
    }
    Ok(())
}
