use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::DirectoryEntry,
        value_objects::UserId,
    },
    ports::repositories::UserDirectory,
};

/// SQL-based user directory using PostgreSQL
#[derive(Clone)]
pub struct SqlUserDirectory {
    pool: PgPool,
}

impl SqlUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS push_recipients (
                user_id TEXT PRIMARY KEY,
                push_token TEXT,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn entry_from_parts(user_id: String, push_token: Option<String>) -> RepositoryResult<DirectoryEntry> {
    let user_id = UserId::new(user_id).map_err(|e| RepositoryError::CorruptRecord {
        collection: "push_recipients".to_string(),
        message: e.to_string(),
    })?;

    Ok(DirectoryEntry {
        user_id,
        push_token,
    })
}

#[async_trait]
impl UserDirectory for SqlUserDirectory {
    async fn list_users(&self) -> RepositoryResult<Vec<DirectoryEntry>> {
        let rows = sqlx::query("SELECT user_id, push_token FROM push_recipients ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| entry_from_parts(row.try_get("user_id")?, row.try_get("push_token")?))
            .collect()
    }

    async fn find_user(&self, user_id: &UserId) -> RepositoryResult<Option<DirectoryEntry>> {
        let row = sqlx::query("SELECT user_id, push_token FROM push_recipients WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(entry_from_parts(
                row.try_get("user_id")?,
                row.try_get("push_token")?,
            )?)),
            None => Ok(None),
        }
    }

    async fn register_push_token(&self, user_id: &UserId, token: &str) -> RepositoryResult<()> {
        let token = token.trim();
        let token = (!token.is_empty()).then_some(token);

        sqlx::query(
            r#"
            INSERT INTO push_recipients (user_id, push_token, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET push_token = EXCLUDED.push_token, updated_at = NOW()
            "#,
        )
        .bind(user_id.as_str())
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
