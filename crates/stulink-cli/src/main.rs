use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use stulink_cli::create_superadmin;
use stulink_db::{DatabaseConfig, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "stulink-cli")]
#[command(about = "Stulink CLI - Administrative tools for Stulink", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Superadmin account
    CreateSuperadmin {
        /// Username for the new admin
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateSuperadmin { username, password } => {
            handle_create_superadmin(&pool, username, password).await
        }
        Commands::Migrate => handle_migrate(&pool).await,
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let config =
        DatabaseConfig::from_env().map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&config).await?;
    Ok(pool)
}

fn prompt_username() -> anyhow::Result<String> {
    Ok(Input::<String>::new().with_prompt("Username").interact_text()?)
}

fn prompt_password() -> anyhow::Result<String> {
    Ok(Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()?)
}

fn read_credentials(
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => prompt_username()?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    Ok((username, password))
}

async fn handle_create_superadmin(
    pool: &PgPool,
    username: Option<String>,
    password: Option<String>,
) {
    let credentials = read_credentials(username, password);
    let (username, password) = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("\n❌ Failed to read input: {}", e);
            std::process::exit(1);
        }
    };

    match create_superadmin(pool, &username, &password).await {
        Ok(admin) => {
            println!("\n✅ Superadmin created successfully!");
            println!("   Username: {}", admin.username);
            println!("   ID: {}", admin.id);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating superadmin: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_migrate(pool: &PgPool) {
    match run_migrations(pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("\n❌ Error applying migrations: {}", e);
            std::process::exit(1);
        }
    }
}
