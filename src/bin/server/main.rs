use anyhow::{Context, Result};
use campus_lost_found::{
    adapters::outbound::notifications::DEFAULT_PUSH_ENDPOINT,
    app::{
        AppBuilder, AppConfig, NotificationBackend, RepositoryBackend, StorageBackend,
        DEFAULT_PUBLIC_BASE_URL,
    },
};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lost-found-server")]
#[command(about = "Campus lost-and-found posting server", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Image storage backend: memory, local or s3
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Root directory for the local storage backend
    #[arg(long, env = "STORAGE_ROOT")]
    storage_root: Option<String>,

    /// S3 endpoint URL (for S3-compatible services)
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 bucket name
    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: Option<String>,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    s3_secret_key: Option<String>,

    /// Public prefix of stored image URLs
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = DEFAULT_PUBLIC_BASE_URL)]
    public_base_url: String,

    /// Repository backend: memory or database
    #[arg(long, env = "REPOSITORY_BACKEND", default_value = "memory")]
    repository_backend: String,

    /// Database URL for repository backend (PostgreSQL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Push delivery backend: recording or http
    #[arg(long, env = "NOTIFICATION_BACKEND", default_value = "recording")]
    notification_backend: String,

    /// Push service endpoint for the http notification backend
    #[arg(long, env = "PUSH_ENDPOINT")]
    push_endpoint: Option<String>,

    /// Bearer token for the push service
    #[arg(long, env = "PUSH_ACCESS_TOKEN")]
    push_access_token: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "local" => {
                let root = self
                    .storage_root
                    .clone()
                    .context("STORAGE_ROOT is required for local backend")?;
                StorageBackend::LocalFileSystem { root }
            }
            "s3" => {
                let bucket = self
                    .s3_bucket
                    .clone()
                    .context("S3_BUCKET is required for S3 backend")?;

                StorageBackend::S3 {
                    bucket,
                    region: self.s3_region.clone(),
                    endpoint: self.s3_endpoint.clone(),
                    access_key: self.s3_access_key.clone(),
                    secret_key: self.s3_secret_key.clone(),
                }
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        let repository_backend = match self.repository_backend.as_str() {
            "memory" => RepositoryBackend::InMemory,
            "database" | "db" => {
                let connection_string = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for database backend")?;
                RepositoryBackend::Database { connection_string }
            }
            _ => anyhow::bail!("Unknown repository backend: {}", self.repository_backend),
        };

        let notification_backend = match self.notification_backend.as_str() {
            "recording" => NotificationBackend::Recording,
            "http" => NotificationBackend::Http {
                endpoint: self
                    .push_endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PUSH_ENDPOINT.to_string()),
                access_token: self.push_access_token.clone(),
            },
            _ => anyhow::bail!(
                "Unknown notification backend: {}",
                self.notification_backend
            ),
        };

        Ok(AppConfig {
            storage_backend,
            repository_backend,
            notification_backend,
            public_base_url: self.public_base_url.clone(),
        })
    }

    fn init_logging(&self) -> Result<()> {
        let level = match self.log_level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" => "warn",
            "error" => "error",
            _ => "info",
        };

        // RUST_LOG wins over --log-level when set
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", level)));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialise logging")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting lost-and-found server");
    info!("Storage backend: {}", cli.storage_backend);
    info!("Repository backend: {}", cli.repository_backend);
    info!("Notification backend: {}", cli.notification_backend);

    let config = cli.to_app_config()?;

    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = app_services.router();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
