//! Shared scalar type aliases.

/// Database primary keys are PostgreSQL BIGSERIAL columns.
pub type DbId = i64;

/// Every timestamp in the system is UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Site versions are plain integers assigned by the publish pipeline.
/// Version 0 means "never published".
pub type Version = i64;
