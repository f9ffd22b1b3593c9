use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::sync::Arc;
use tracing::warn;

use super::feed::FeedPublisher;
use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{
            Collection, ItemStatus, LostAndFoundLog, NewLogEntry, NewPosting, Posting, PostingKind,
            StoredImage, UserIdentity,
        },
        value_objects::{DeletionHandle, ItemId, LogId, UserId},
    },
    ports::repositories::{FeedStream, ItemRepository},
};

const LOG_TABLE: &str = "lost_and_found_logs";

const POSTING_COLUMNS: &str = "id, poster_user_id, poster_email, poster_phone, item_name, \
     description, location, image_url, image_deletion_handle, occurred_date, \
     occurred_time_label, created_at, status";

fn table(collection: Collection) -> &'static str {
    match collection {
        Collection::LostItems => "lost_items",
        Collection::FoundItems => "found_items",
        Collection::LostAndFoundLogs => LOG_TABLE,
    }
}

fn posting_table(kind: PostingKind) -> &'static str {
    table(kind.collection())
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Backend {
            message: format!("Database error: {}", err),
        }
    }
}

fn corrupt(collection: Collection, message: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::CorruptRecord {
        collection: collection.name().to_string(),
        message: message.to_string(),
    }
}

/// SQL-based implementation of ItemRepository using PostgreSQL.
///
/// Feed snapshots are republished after this instance's own writes; writes
/// made by other processes show up on the next local write or subscription.
#[derive(Clone)]
pub struct SqlItemRepository {
    pool: PgPool,
    feeds: Arc<FeedPublisher>,
}

impl SqlItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            feeds: Arc::new(FeedPublisher::new()),
        }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for kind in [PostingKind::Lost, PostingKind::Found] {
            let table = posting_table(kind);
            sqlx::raw_sql(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    poster_user_id TEXT NOT NULL,
                    poster_email TEXT NOT NULL,
                    poster_phone TEXT,
                    item_name TEXT NOT NULL,
                    description TEXT NOT NULL,
                    location TEXT NOT NULL,
                    image_url TEXT NOT NULL,
                    image_deletion_handle TEXT NOT NULL,
                    occurred_date DATE NOT NULL,
                    occurred_time_label TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    status TEXT NOT NULL DEFAULT 'active'
                );

                CREATE INDEX IF NOT EXISTS idx_{table}_feed ON {table}(status, created_at DESC);
                "#
            ))
            .execute(&self.pool)
            .await?;
        }

        sqlx::raw_sql(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {LOG_TABLE} (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL,
                item_id TEXT NOT NULL,
                item_name TEXT NOT NULL,
                description TEXT NOT NULL,
                location TEXT NOT NULL,
                image_url TEXT NOT NULL,
                poster_user_id TEXT NOT NULL,
                poster_email TEXT NOT NULL,
                poster_phone TEXT,
                claimer_user_id TEXT NOT NULL,
                claimer_email TEXT NOT NULL,
                claimer_phone TEXT,
                occurred_date DATE NOT NULL,
                occurred_time_label TEXT NOT NULL,
                resolved_at TIMESTAMPTZ NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_{LOG_TABLE}_resolved ON {LOG_TABLE}(resolved_at DESC);
            CREATE INDEX IF NOT EXISTS idx_{LOG_TABLE}_item ON {LOG_TABLE}(item_id);
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_active(&self, kind: PostingKind) -> RepositoryResult<Vec<Posting>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM {}
            WHERE status = 'active'
            ORDER BY created_at DESC, id DESC
            "#,
            POSTING_COLUMNS,
            posting_table(kind)
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| posting_from_row(kind, row)).collect()
    }

    /// Re-read the active feed and push it to subscribers
    async fn refresh_feed(&self, kind: PostingKind) {
        match self.fetch_active(kind).await {
            Ok(snapshot) => self.feeds.publish(kind, snapshot),
            Err(e) => warn!(kind = %kind, error = %e, "failed to refresh feed snapshot"),
        }
    }
}

fn identity(
    collection: Collection,
    user_id: String,
    email: String,
    phone: Option<String>,
) -> RepositoryResult<UserIdentity> {
    let user_id = UserId::new(user_id).map_err(|e| corrupt(collection, e))?;
    UserIdentity::new(user_id, email, phone).map_err(|e| corrupt(collection, e))
}

fn posting_from_row(kind: PostingKind, row: &PgRow) -> RepositoryResult<Posting> {
    let collection = kind.collection();

    let id = ItemId::new(row.try_get("id")?).map_err(|e| corrupt(collection, e))?;
    let poster = identity(
        collection,
        row.try_get("poster_user_id")?,
        row.try_get("poster_email")?,
        row.try_get("poster_phone")?,
    )?;
    let deletion_handle = DeletionHandle::new(row.try_get::<String, _>("image_deletion_handle")?)
        .map_err(|e| corrupt(collection, e))?;
    let status: ItemStatus = row
        .try_get::<String, _>("status")?
        .parse()
        .map_err(|e| corrupt(collection, e))?;

    let record = NewPosting {
        kind,
        poster,
        item_name: row.try_get("item_name")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        image: StoredImage {
            url: row.try_get("image_url")?,
            deletion_handle,
        },
        occurred_date: row.try_get::<NaiveDate, _>("occurred_date")?,
        occurred_time_label: row.try_get("occurred_time_label")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    };

    let mut posting = record.into_posting(id);
    if status != ItemStatus::Active {
        posting.transition(status).map_err(|e| corrupt(collection, e))?;
    }
    Ok(posting)
}

fn log_from_row(row: &PgRow) -> RepositoryResult<LostAndFoundLog> {
    let kind: PostingKind = row
        .try_get::<String, _>("type")?
        .parse()
        .map_err(|e| corrupt(Collection::LostAndFoundLogs, e))?;

    Ok(LostAndFoundLog {
        id: LogId::new(row.try_get("id")?).map_err(|e| corrupt(Collection::LostAndFoundLogs, e))?,
        kind,
        item_id: ItemId::new(row.try_get("item_id")?).map_err(|e| corrupt(Collection::LostAndFoundLogs, e))?,
        item_name: row.try_get("item_name")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        image_url: row.try_get("image_url")?,
        poster: identity(
            Collection::LostAndFoundLogs,
            row.try_get("poster_user_id")?,
            row.try_get("poster_email")?,
            row.try_get("poster_phone")?,
        )?,
        claimer: identity(
            Collection::LostAndFoundLogs,
            row.try_get("claimer_user_id")?,
            row.try_get("claimer_email")?,
            row.try_get("claimer_phone")?,
        )?,
        occurred_date: row.try_get("occurred_date")?,
        occurred_time_label: row.try_get("occurred_time_label")?,
        resolved_at: row.try_get("resolved_at")?,
    })
}

#[async_trait]
impl ItemRepository for SqlItemRepository {
    async fn create_posting(&self, record: NewPosting) -> RepositoryResult<ItemId> {
        let id = ItemId::generate();
        let kind = record.kind;

        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (
                id, poster_user_id, poster_email, poster_phone, item_name, description,
                location, image_url, image_deletion_handle, occurred_date,
                occurred_time_label, created_at, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'active')
            ON CONFLICT (id) DO NOTHING
            "#,
            posting_table(kind)
        ))
        .bind(id.as_str())
        .bind(record.poster.user_id.as_str())
        .bind(&record.poster.email)
        .bind(&record.poster.phone)
        .bind(&record.item_name)
        .bind(&record.description)
        .bind(&record.location)
        .bind(&record.image.url)
        .bind(record.image.deletion_handle.as_str())
        .bind(record.occurred_date)
        .bind(&record.occurred_time_label)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict { id });
        }

        self.refresh_feed(kind).await;
        Ok(id)
    }

    async fn delete_posting(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", posting_table(kind)))
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.refresh_feed(kind).await;
        }

        Ok(())
    }

    async fn posting_exists(&self, kind: PostingKind, id: &ItemId) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            posting_table(kind)
        ))
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_posting(
        &self,
        kind: PostingKind,
        id: &ItemId,
    ) -> RepositoryResult<Option<Posting>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            POSTING_COLUMNS,
            posting_table(kind)
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(|row| posting_from_row(kind, row))
            .transpose()
    }

    async fn active_postings(&self, kind: PostingKind) -> RepositoryResult<Vec<Posting>> {
        self.fetch_active(kind).await
    }

    async fn subscribe(&self, kind: PostingKind) -> RepositoryResult<FeedStream> {
        // Other processes may have written since our last publish
        let snapshot = self.fetch_active(kind).await?;
        self.feeds.publish(kind, snapshot);
        Ok(self.feeds.subscribe(kind))
    }

    async fn append_log(&self, entry: NewLogEntry) -> RepositoryResult<LogId> {
        let id = LogId::generate();

        sqlx::query(&format!(
            r#"
            INSERT INTO {LOG_TABLE} (
                id, type, item_id, item_name, description, location, image_url,
                poster_user_id, poster_email, poster_phone,
                claimer_user_id, claimer_email, claimer_phone,
                occurred_date, occurred_time_label, resolved_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#
        ))
        .bind(id.as_str())
        .bind(entry.kind.as_str())
        .bind(entry.item_id.as_str())
        .bind(&entry.item_name)
        .bind(&entry.description)
        .bind(&entry.location)
        .bind(&entry.image_url)
        .bind(entry.poster.user_id.as_str())
        .bind(&entry.poster.email)
        .bind(&entry.poster.phone)
        .bind(entry.claimer.user_id.as_str())
        .bind(&entry.claimer.email)
        .bind(&entry.claimer.phone)
        .bind(entry.occurred_date)
        .bind(&entry.occurred_time_label)
        .bind(entry.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_logs(&self) -> RepositoryResult<Vec<LostAndFoundLog>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT id, type, item_id, item_name, description, location, image_url,
                   poster_user_id, poster_email, poster_phone,
                   claimer_user_id, claimer_email, claimer_phone,
                   occurred_date, occurred_time_label, resolved_at
            FROM {LOG_TABLE}
            ORDER BY resolved_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(log_from_row).collect()
    }
}
