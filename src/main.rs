// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use project_em::app::{create_router, AppState, VERSION};
use project_em::config::AppConfig;
use project_em::models::user::{validate_email, UserFields};
use project_em::services::db::PostgresStore;
use project_em::services::logging::{self, anonymize_email};
use project_em::services::password::PasswordHasher;
use project_em::services::store::{MemoryStore, Store};
use project_em::services::users::UserManager;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "project-em", version = VERSION, about = "Project catalog and user administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Create a regular user
    CreateUser(CreateUserArgs),
    /// Create a superuser (staff, superuser and active)
    CreateSuperuser(NewUserArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on; overrides BIND_ADDR
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Create this superuser at startup if the email is not registered yet
    #[arg(long, env = "BOOTSTRAP_SUPERUSER_EMAIL", requires = "superuser_password")]
    superuser_email: Option<String>,
    #[arg(long, env = "BOOTSTRAP_SUPERUSER_PASSWORD", hide_env_values = true)]
    superuser_password: Option<String>,
}

#[derive(Args)]
struct NewUserArgs {
    #[arg(long)]
    email: String,
    /// Raw password; without it the account gets an unusable password
    #[arg(long, env = "PROJECT_EM_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// Date of birth as YYYY-MM-DD
    #[arg(long)]
    date_of_birth: Option<NaiveDate>,
}

#[derive(Args)]
struct CreateUserArgs {
    #[command(flatten)]
    user: NewUserArgs,
    /// Grant staff access
    #[arg(long)]
    staff: bool,
}

enum AccountKind {
    Regular { staff: bool },
    Superuser,
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url, config.database_max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            tracing::info!("[DB] Connected to Postgres");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("[DB] DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn user_manager(config: &AppConfig, store: Arc<dyn Store>) -> Result<UserManager> {
    let hasher = PasswordHasher::new(&config.hash).context("Invalid password hash settings")?;
    Ok(UserManager::new(store, hasher))
}

async fn serve(config: AppConfig, args: ServeArgs) -> Result<()> {
    let store = open_store(&config).await?;
    let users = user_manager(&config, store.clone())?;

    if let (Some(email), Some(password)) = (&args.superuser_email, &args.superuser_password) {
        bootstrap_superuser(store.as_ref(), &users, email, password).await?;
    }

    let app = create_router(AppState::new(store, users));

    let addr = args.bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("project-em v{} listening on {}", VERSION, addr);

    axum::serve(listener, app).await.context("Server error")
}

async fn bootstrap_superuser(
    store: &dyn Store,
    users: &UserManager,
    email: &str,
    password: &str,
) -> Result<()> {
    let normalized = project_em::services::users::normalize_email(email);
    if store.find_user_by_email(&normalized).await?.is_some() {
        tracing::info!(
            "[USERS] Bootstrap superuser {} already exists",
            anonymize_email(&normalized)
        );
        return Ok(());
    }

    users
        .create_superuser(email, Some(password), None, UserFields::default())
        .await?;
    Ok(())
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let Some(url) = &config.database_url else {
        bail!("DATABASE_URL must be set to run migrations");
    };

    let store = PostgresStore::connect(url, config.database_max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    store.migrate().await.context("Failed to apply migrations")?;

    tracing::info!("[DB] Migrations applied");
    Ok(())
}

async fn create_user(config: &AppConfig, args: NewUserArgs, kind: AccountKind) -> Result<()> {
    if config.database_url.is_none() {
        bail!("DATABASE_URL must be set to create users");
    }
    if args.first_name.trim().is_empty() || args.last_name.trim().is_empty() {
        bail!("--first-name and --last-name must not be empty");
    }
    validate_email(&args.email).map_err(anyhow::Error::msg)?;

    let store = open_store(config).await?;
    let users = user_manager(config, store)?;

    let fields = UserFields::named(args.first_name.trim(), args.last_name.trim());
    let user = match kind {
        AccountKind::Superuser => {
            users
                .create_superuser(
                    &args.email,
                    args.password.as_deref(),
                    args.date_of_birth,
                    fields,
                )
                .await?
        }
        AccountKind::Regular { staff } => {
            let fields = UserFields {
                is_staff: Some(staff),
                ..fields
            };
            users
                .create_user(
                    &args.email,
                    args.password.as_deref(),
                    args.date_of_birth,
                    fields,
                )
                .await?
        }
    };

    println!("Created user {} (id {})", user, user.id);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    logging::init(&config.log_level);

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Migrate => migrate(&config).await,
        Command::CreateUser(args) => {
            let kind = AccountKind::Regular { staff: args.staff };
            create_user(&config, args.user, kind).await
        }
        Command::CreateSuperuser(args) => {
            create_user(&config, args, AccountKind::Superuser).await
        }
    }
}
