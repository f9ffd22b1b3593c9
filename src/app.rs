use axum::Router;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory,
    ObjectStore as ObjectStoreBackend,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::{
    adapters::{
        inbound::http::{create_router, AppState},
        outbound::{
            notifications::{
                DirectoryNotificationGateway, HttpPushTransport, RecordingPushTransport,
                DEFAULT_PUSH_ENDPOINT,
            },
            persistence::{
                InMemoryItemRepository, InMemoryUserDirectory, SqlItemRepository,
                SqlUserDirectory,
            },
            storage::{ObjectStoreImageStore, StoreError},
        },
    },
    ports::{
        notifications::{NotificationGateway, PushTransport},
        repositories::{ItemRepository, UserDirectory},
        storage::ImageStore,
    },
    services::LifecycleServiceImpl,
};

/// Base URL used for image links when nothing else is configured
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000/images";

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
    pub notification_backend: NotificationBackend,
    /// Prefix joined with an object path to form the durable image URL
    pub public_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            repository_backend: RepositoryBackend::InMemory,
            notification_backend: NotificationBackend::Recording,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        }
    }
}

/// Image storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    LocalFileSystem {
        root: String,
    },
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
    },
}

/// Repository backend configuration
#[derive(Debug, Clone)]
pub enum RepositoryBackend {
    InMemory,
    Database { connection_string: String },
}

/// Push delivery configuration
#[derive(Debug, Clone)]
pub enum NotificationBackend {
    /// Keep delivered messages in memory
    Recording,
    Http {
        endpoint: String,
        access_token: Option<String>,
    },
}

/// Application dependencies container
pub struct AppDependencies {
    pub image_store: Arc<dyn ImageStore>,
    pub item_repository: Arc<dyn ItemRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub push_transport: Arc<dyn PushTransport>,
    /// Set when the recording backend is selected, so callers can inspect deliveries
    pub push_recorder: Option<RecordingPushTransport>,
}

/// Application services container
pub struct AppServices {
    pub lifecycle_service: LifecycleServiceImpl,
    pub item_repository: Arc<dyn ItemRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub image_store: Arc<dyn ImageStore>,
    pub push_recorder: Option<RecordingPushTransport>,
}

impl AppServices {
    /// HTTP router serving these services
    pub fn router(&self) -> Router {
        create_router(AppState {
            lifecycle_service: Arc::new(self.lifecycle_service.clone()),
            item_repository: self.item_repository.clone(),
            user_directory: self.user_directory.clone(),
            image_store: self.image_store.clone(),
        })
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Configure push delivery
    pub fn with_notification_backend(mut self, backend: NotificationBackend) -> Self {
        self.config.notification_backend = backend;
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.public_base_url = url.into();
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(self) -> Result<AppDependencies, AppError> {
        let image_store = self.create_image_store()?;
        let (item_repository, user_directory) = self.create_repositories().await?;
        let (push_transport, push_recorder) = self.create_push_transport();

        Ok(AppDependencies {
            image_store,
            item_repository,
            user_directory,
            push_transport,
            push_recorder,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let gateway: Arc<dyn NotificationGateway> = Arc::new(DirectoryNotificationGateway::new(
            deps.user_directory.clone(),
            deps.push_transport.clone(),
        ));

        let lifecycle_service = LifecycleServiceImpl::new(
            deps.item_repository.clone(),
            deps.image_store.clone(),
            gateway,
        );

        Ok(AppServices {
            lifecycle_service,
            item_repository: deps.item_repository,
            user_directory: deps.user_directory,
            image_store: deps.image_store,
            push_recorder: deps.push_recorder,
        })
    }

    fn create_image_store(&self) -> Result<Arc<dyn ImageStore>, AppError> {
        let backend: Arc<dyn ObjectStoreBackend> = match &self.config.storage_backend {
            StorageBackend::InMemory => Arc::new(InMemory::new()),
            StorageBackend::LocalFileSystem { root } => {
                std::fs::create_dir_all(root).map_err(StoreError::from)?;
                Arc::new(LocalFileSystem::new_with_prefix(root).map_err(StoreError::from)?)
            }
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
            } => {
                if bucket.trim().is_empty() {
                    return Err(StoreError::invalid_config("S3 bucket name is empty").into());
                }

                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(bucket)
                    .with_region(region);

                if let Some(endpoint) = endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                if let Some(access_key) = access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }

                Arc::new(builder.build().map_err(StoreError::from)?)
            }
        };

        Ok(Arc::new(ObjectStoreImageStore::new(
            backend,
            self.config.public_base_url.clone(),
        )))
    }

    async fn create_repositories(
        &self,
    ) -> Result<(Arc<dyn ItemRepository>, Arc<dyn UserDirectory>), AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => Ok((
                Arc::new(InMemoryItemRepository::new()),
                Arc::new(InMemoryUserDirectory::new()),
            )),
            RepositoryBackend::Database { connection_string } => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("cannot connect to database: {}", e),
                    })?;

                let items = SqlItemRepository::new(pool.clone());
                let directory = SqlUserDirectory::new(pool);

                items.migrate().await.map_err(|e| AppError::RepositoryInit {
                    message: format!("item migration failed: {}", e),
                })?;
                directory
                    .migrate()
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("directory migration failed: {}", e),
                    })?;

                Ok((Arc::new(items), Arc::new(directory)))
            }
        }
    }

    fn create_push_transport(&self) -> (Arc<dyn PushTransport>, Option<RecordingPushTransport>) {
        match &self.config.notification_backend {
            NotificationBackend::Recording => {
                let recorder = RecordingPushTransport::new();
                (Arc::new(recorder.clone()), Some(recorder))
            }
            NotificationBackend::Http {
                endpoint,
                access_token,
            } => (
                Arc::new(HttpPushTransport::new(
                    endpoint.clone(),
                    access_token.clone(),
                )),
                None,
            ),
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {0}")]
    Storage(#[from] StoreError),

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_repository_backend(RepositoryBackend::InMemory)
        .with_notification_backend(NotificationBackend::Recording)
        .build()
        .await
}

fn required_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| AppError::Configuration {
        message: format!("{} environment variable required", name),
    })
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("local") => StorageBackend::LocalFileSystem {
            root: required_env("STORAGE_ROOT")?,
        },
        Ok("s3") => StorageBackend::S3 {
            bucket: required_env("S3_BUCKET")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            access_key: std::env::var("S3_ACCESS_KEY").ok(),
            secret_key: std::env::var("S3_SECRET_KEY").ok(),
        },
        _ => StorageBackend::InMemory,
    };

    let repository_backend = match std::env::var("REPOSITORY_BACKEND").as_deref() {
        Ok("database") => RepositoryBackend::Database {
            connection_string: required_env("DATABASE_URL")?,
        },
        _ => RepositoryBackend::InMemory,
    };

    let notification_backend = match std::env::var("NOTIFICATION_BACKEND").as_deref() {
        Ok("http") => NotificationBackend::Http {
            endpoint: std::env::var("PUSH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_PUSH_ENDPOINT.to_string()),
            access_token: std::env::var("PUSH_ACCESS_TOKEN").ok(),
        },
        _ => NotificationBackend::Recording,
    };

    let public_base_url =
        std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());

    AppBuilder::new()
        .with_config(AppConfig {
            storage_backend,
            repository_backend,
            notification_backend,
            public_base_url,
        })
        .build()
        .await
}
