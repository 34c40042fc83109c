//! CareHub Server: hospital management REST backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use carehub_api::AppState;
use carehub_core::config::{AppConfig, DatabaseProvider, LogFormat};
use carehub_core::error::AppError;
use carehub_database::migration::run_migrations;
use carehub_database::{DatabasePool, Repositories};
use carehub_service::account::CreateAccountRequest;
use carehub_service::{LogMailer, Mailer};

#[tokio::main]
async fn main() {
    let env = std::env::var("CAREHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(%env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CareHub v{}", env!("CARGO_PKG_VERSION"));

    let (repos, database) = match config.database.provider {
        DatabaseProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            run_migrations(pool.pool()).await?;
            (Repositories::postgres(pool.pool().clone()), Some(pool))
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using the in-memory backend; data is lost on restart");
            (Repositories::in_memory(), None)
        }
    };

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(&config.mail));
    let state = AppState::build(config.clone(), repos, database.clone(), mailer);

    bootstrap_admin(&config, &state).await?;

    let result = carehub_api::serve(&config, state).await;

    if let Some(pool) = database {
        pool.close().await;
    }
    result
}

/// Create the configured super admin when the username is still free.
async fn bootstrap_admin(config: &AppConfig, state: &AppState) -> Result<(), AppError> {
    let Some(admin) = &config.auth.bootstrap_admin else {
        return Ok(());
    };

    let created = state
        .account_service
        .ensure_account(CreateAccountRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            display_name: Some("Platform administrator".to_string()),
            password: admin.password.clone(),
            authorities: vec![carehub_auth::Authority::SuperAdmin],
            assignments: Vec::new(),
        })
        .await?;

    if created {
        tracing::info!(username = %admin.username, "Bootstrap super admin created");
    }
    Ok(())
}
