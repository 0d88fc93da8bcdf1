//! Domain-level error type shared across the workspace.

/// Errors produced by domain logic and surfaced through every layer above.
///
/// The API crate maps these onto HTTP statuses; lower layers construct them
/// directly. Entities are addressed by subdomain or numeric id, so the
/// not-found variant carries the lookup key as a string.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup came up empty.
    #[error("{entity} '{key}' not found")]
    NotFound {
        entity: &'static str,
        key: String,
    },

    /// Input failed validation before any I/O happened.
    #[error("{0}")]
    Validation(String),

    /// The request collides with state owned by someone else.
    #[error("{0}")]
    Conflict(String),

    /// The caller is not the owner of the entity it is mutating.
    #[error("{0}")]
    Forbidden(String),

    /// An invariant was broken internally.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a not-found error on a string key.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }
}
