use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use quill::cli::create_user;
use quill::cli::seeder::{SeedCounts, seed_database};
use quill::config::DatabaseConfig;
use quill::quill_auth::Role;

#[derive(Parser)]
#[command(name = "quill-cli")]
#[command(about = "Quill CLI - administrative tools for the Quill API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account with any role (the only way to create an admin)
    CreateUser {
        /// Username (3-21 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// One of: admin, mod, registered
        #[arg(short = 'r', long, default_value = "admin")]
        role: Role,
    },
    /// Seed the database with fake users, posts and comments
    Seed {
        #[arg(long, default_value = "50")]
        users: usize,

        #[arg(long, default_value = "100")]
        posts: usize,

        #[arg(long, default_value = "500")]
        comments: usize,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env()?;
    let pool = quill::quill_db::init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            password,
            role,
        } => {
            let username = match username {
                Some(username) => username,
                None => Input::new().with_prompt("Username").interact_text()?,
            };
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email address").interact_text()?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };

            let user = create_user(&pool, &username, &email, &password, role).await?;
            println!("✅ User created successfully!");
            println!("   ID: {}", user.id);
            println!("   Username: {}", user.username);
            println!("   Role: {}", user.role);
        }
        Commands::Seed {
            users,
            posts,
            comments,
        } => {
            seed_database(
                &pool,
                SeedCounts {
                    users,
                    posts,
                    comments,
                },
            )
            .await?;
        }
        Commands::Migrate => {
            quill::quill_db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
