use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use rentbook::api::{AppState, app_router};
use rentbook::auth::Argon2Hasher;
use rentbook::config::{Config, random_secret, redact_db_url};
use rentbook::session::JwtCodec;
use sea_orm::Database;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "rentbook", about = "Rentbook — property, tenant and payment records API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default)
    Serve,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Init structured logging (respects RUST_LOG; defaults to info, or debug with RENTBOOK_DEBUG)
    let default_filter = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let cli = Cli::parse();

    // Connect to the database and run migrations
    tracing::info!(database = %redact_db_url(&config.database_url), "connecting to database");

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    tracing::info!("database initialized");

    let jwt_secret = config.jwt_secret.clone().unwrap_or_else(|| {
        tracing::warn!(
            "RENTBOOK_JWT_SECRET not set — using a random secret. \
             Tokens will be invalidated on every restart."
        );
        random_secret()
    });

    let state = AppState::new(
        db,
        Arc::new(Argon2Hasher),
        Arc::new(JwtCodec::new(jwt_secret, config.jwt_expiry_hours)),
    );

    match cli.command {
        None | Some(Commands::Serve) => serve(state, &config).await?,
        Some(Commands::User { action }) => handle_user_action(state, action).await?,
    }

    Ok(())
}

async fn serve(state: AppState, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let users = state.credentials.count_users().await?;
    if users == 0 {
        tracing::info!("no users registered yet; POST /auth/register to create one");
    }

    match config.jwt_expiry_hours {
        Some(hours) => tracing::info!(hours, "tokens expire"),
        None => tracing::info!("tokens do not expire"),
    }

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API online");

    axum::serve(listener, app_router(state, &config.cors_allowed_origins)).await?;

    Ok(())
}

async fn handle_user_action(
    state: AppState,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Create {
            email,
            password,
            name,
        } => {
            let user = state.credentials.register(&email, &password, &name).await?;
            tracing::info!(user_id = user.id, email = %user.email, "Created user");
        }
    }
    Ok(())
}
