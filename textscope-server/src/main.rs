//! textscope-server - text analysis web service
//!
//! Subcommands:
//! - `serve` (default): run the HTTP service
//! - `add-user`: provision a user and print their bearer token once
//! - `deactivate-user` / `activate-user`: toggle access without deleting data

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use textscope_common::api::auth::{generate_token, hash_token};
use textscope_common::config::{ConfigOverrides, Environment, ServiceConfig, TomlConfig};
use textscope_common::db::init_database;
use textscope_nlp::Toolkit;
use textscope_server::db::users;
use textscope_server::{build_router, AppState, NlpStatus};

/// Command-line arguments for textscope-server
#[derive(Parser, Debug)]
#[command(name = "textscope-server")]
#[command(about = "Text analysis web service")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Create a user and print a new access token
    AddUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Block a user's token without deleting their analyses
    DeactivateUser {
        #[arg(long)]
        username: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Re-enable a deactivated user
    ActivateUser {
        #[arg(long)]
        username: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
struct CommonArgs {
    /// TOML config file
    #[arg(long, env = "TEXTSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the database
    #[arg(long, env = "TEXTSCOPE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Database file (default: <root-folder>/textscope.db)
    #[arg(long, env = "TEXTSCOPE_DATABASE")]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TEXTSCOPE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
struct ServeArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Address to bind
    #[arg(long, env = "TEXTSCOPE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TEXTSCOPE_PORT")]
    port: Option<u16>,

    /// development or production
    #[arg(long, env = "TEXTSCOPE_ENVIRONMENT")]
    environment: Option<Environment>,

    /// Directory overriding the embedded language resources
    #[arg(long, env = "TEXTSCOPE_RESOURCE_DIR")]
    resource_dir: Option<PathBuf>,

    /// Directory served under /static instead of the embedded UI script
    #[arg(long, env = "TEXTSCOPE_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Maximum accepted text length in characters
    #[arg(long, env = "TEXTSCOPE_MAX_CONTENT_LENGTH")]
    max_content_length: Option<usize>,
}

impl ServeArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            environment: self.environment,
            resource_dir: self.resource_dir.clone(),
            static_dir: self.static_dir.clone(),
            max_content_length: self.max_content_length,
            ..self.common.overrides()
        }
    }
}

impl CommonArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_folder: self.root_folder.clone(),
            database: self.database.clone(),
            log_level: self.log_level.clone(),
            ..Default::default()
        }
    }

    /// Load the TOML file and merge the given overrides over it
    fn resolve(&self, overrides: &ConfigOverrides) -> Result<ServiceConfig> {
        let toml_config = TomlConfig::discover(self.config.as_deref())?;
        Ok(ServiceConfig::resolve(overrides, &toml_config)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
        Some(Command::AddUser {
            username,
            email,
            common,
        }) => add_user(&common, &username, &email).await,
        Some(Command::DeactivateUser { username, common }) => {
            set_user_active(&common, &username, false).await
        }
        Some(Command::ActivateUser { username, common }) => {
            set_user_active(&common, &username, true).await
        }
    }
}

/// Initialize tracing; RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "textscope_server={level},textscope_common={level},textscope_nlp={level},tower_http={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(args: ServeArgs) -> Result<()> {
    let config = args.common.resolve(&args.overrides())?;
    init_tracing(&config.log_level);

    // Build identification first, before any slow start-up work
    info!(
        "Starting TextScope (textscope-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Environment: {}", config.environment);
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let nlp = match Toolkit::load(config.resource_dir.as_deref()) {
        Err(e) if config.environment.is_production() => {
            error!("NLP toolkit unavailable: {}", e);
            return Err(e).context("Failed to load NLP resources");
        }
        loaded => NlpStatus::from(loaded),
    };
    match &nlp {
        NlpStatus::Ready(_) => info!("✓ NLP toolkit loaded"),
        NlpStatus::Unavailable(reason) => {
            warn!("NLP toolkit unavailable: {}", reason);
            warn!("Continuing in development mode; /analyze will answer 503");
        }
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, nlp, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("textscope-server listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn add_user(common: &CommonArgs, username: &str, email: &str) -> Result<()> {
    let config = common.resolve(&common.overrides())?;
    init_tracing(&config.log_level);

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let token = generate_token();
    let user = users::register_user(&pool, username, email, &hash_token(&token)).await?;

    info!("Created user {} (id {})", user.username, user.id);
    println!("User:  {}", user.username);
    println!("Token: {}", token);
    println!("Store this token now; it cannot be shown again.");

    pool.close().await;
    Ok(())
}

async fn set_user_active(common: &CommonArgs, username: &str, active: bool) -> Result<()> {
    let config = common.resolve(&common.overrides())?;
    init_tracing(&config.log_level);

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    users::set_active(&pool, username, active).await?;

    println!(
        "User {} {}",
        username,
        if active { "activated" } else { "deactivated" }
    );

    pool.close().await;
    Ok(())
}

/// Graceful shutdown on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
