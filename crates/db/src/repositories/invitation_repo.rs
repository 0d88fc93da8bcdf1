//! Repository for the `invitations` table.
//!
//! The publishing core only reads invitations; `create` exists for tests
//! and seeding.

use invita_core::types::DbId;
use sqlx::PgPool;

use crate::models::invitation::{CreateInvitation, Invitation};

/// Column list for `invitations` queries.
const INVITATION_COLUMNS: &str = "id, user_id, layout_id, data, created_at, updated_at";

/// Read access to invitation documents.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Find an invitation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = $1");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create an invitation document.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInvitation,
    ) -> Result<Invitation, sqlx::Error> {
        let data = input
            .data
            .as_ref()
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let query = format!(
            "INSERT INTO invitations (user_id, layout_id, data) \
             VALUES ($1, $2, $3) \
             RETURNING {INVITATION_COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(input.user_id)
            .bind(&input.layout_id)
            .bind(&data)
            .fetch_one(pool)
            .await
    }
}
