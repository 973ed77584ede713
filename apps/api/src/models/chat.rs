use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One row of the `chat_memory` table.
///
/// Rows with a non-null `resume_details` carry extracted resume text and are
/// excluded from conversational history when rendering the prompt. Retrieved
/// turns are read-only history; the pipeline only ever appends new rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatTurn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub message: String,
    pub resume_details: Option<String>,
    pub created_at: DateTime<Utc>,
}
