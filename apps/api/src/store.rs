//! Postgres-backed identity and conversation store.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::chat::{ConversationStore, IdentityStore};
use crate::models::chat::{ChatTurn, Role};

/// Durable store over the `users` and `chat_memory` tables.
/// Cheap to clone; handlers construct one per request from the shared pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns resume-bearing turns for a user, most recent first.
    pub async fn resume_records(&self, user_id: Uuid) -> Result<Vec<ChatTurn>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, role, message, resume_details, created_at
            FROM chat_memory
            WHERE user_id = $1 AND resume_details IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Inserts a resume-bearing turn recording an upload.
    pub async fn save_resume(
        &self,
        user_id: Uuid,
        filename: &str,
        resume_text: &str,
    ) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO chat_memory (id, user_id, role, message, resume_details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Role::User.as_str())
        .bind(format!("Uploaded resume: {filename}"))
        .bind(resume_text)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn lookup(&self, email: &str) -> Result<Option<Uuid>> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}

#[async_trait]
impl ConversationStore for PgStore {
    async fn history(&self, user_id: Uuid) -> Result<Vec<ChatTurn>> {
        let turns: Vec<ChatTurn> = sqlx::query_as(
            r#"
            SELECT id, user_id, role, message, resume_details, created_at
            FROM chat_memory
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} turns for user {}", turns.len(), user_id);
        Ok(turns)
    }

    async fn append(&self, user_id: Uuid, role: Role, message: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO chat_memory (id, user_id, role, message)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(message)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
