//! User record management against the identity store tables.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

/// Minimal shape check; emails are stored lowercase.
pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AppError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email)
}

/// Postgres error code for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

/// Registers a new user. Duplicate emails are rejected; the unique
/// constraint on `users.email` is the authority, so a concurrent signup
/// losing the race still surfaces as `EmailExists`, not a database error.
pub async fn signup(pool: &PgPool, email: &str) -> Result<User, AppError> {
    let email = validate_email(email)?;

    // Fast path; the INSERT below still catches concurrent registrations.
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        warn!("Signup attempt with existing email: {email}");
        return Err(AppError::EmailExists(email));
    }

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, email)
        VALUES ($1, $2)
        RETURNING id, email, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if is_unique_violation(db.code().as_deref()) => {
            warn!("Concurrent signup lost the race for email: {email}");
            AppError::EmailExists(email.clone())
        }
        _ => AppError::Database(e),
    })?;

    info!("User created with id {} for email {}", user.id, user.email);
    Ok(user)
}

pub async fn get_user(pool: &PgPool, email: &str) -> Result<User, AppError> {
    let email = validate_email(email)?;
    let user: Option<User> =
        sqlx::query_as("SELECT id, email, created_at FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(pool)
            .await?;
    user.ok_or(AppError::UserNotFound(email))
}

/// Deletes a user; chat history rows cascade.
pub async fn delete_user(pool: &PgPool, email: &str) -> Result<Uuid, AppError> {
    let email = validate_email(email)?;
    let deleted: Option<(Uuid,)> = sqlx::query_as("DELETE FROM users WHERE email = $1 RETURNING id")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let id = deleted.map(|(id,)| id).ok_or(AppError::UserNotFound(email.clone()))?;
    info!("Deleted user {id} ({email})");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_lowercases_and_trims() {
        assert_eq!(
            validate_email("  Jane@Example.COM ").unwrap(),
            "jane@example.com"
        );
    }

    #[test]
    fn test_unique_violation_code_is_recognized() {
        assert!(is_unique_violation(Some("23505")));
        assert!(!is_unique_violation(Some("23503"))); // foreign key violation
        assert!(!is_unique_violation(Some("40001"))); // serialization failure
        assert!(!is_unique_violation(None));
    }

    #[test]
    fn test_validate_email_rejects_garbage() {
        for bad in ["", "no-at-sign", "local@", "@domain.com", "a@nodot"] {
            assert!(
                matches!(validate_email(bad), Err(AppError::InvalidInput(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }
}
