//! Invitation models.
//!
//! Invitations are owned by the editor surface; the publishing core reads
//! them for ownership checks and as renderer input.

use invita_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invitation {
    pub id: DbId,
    pub user_id: DbId,
    /// Identifier of the layout the renderer should apply.
    pub layout_id: String,
    /// Opaque invitation content passed through to the renderer.
    pub data: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an invitation (used by tests and seeding).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitation {
    pub user_id: DbId,
    pub layout_id: String,
    pub data: Option<serde_json::Value>,
}
