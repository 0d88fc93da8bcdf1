//! Repository for the `users` table.
//!
//! Minimal surface: the publishing core treats users as an authorization
//! anchor only. `create` exists for tests and seeding.

use invita_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, email, created_at, updated_at";

/// Read/seed access to user rows.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a user row.
    pub async fn create(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email) VALUES ($1) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
