//! Pure domain logic for the Invita publishing service.
//!
//! No I/O lives here: subdomain normalization, artifact-key validation,
//! the snapshot bundle value types, and the shared error type. Everything
//! in this crate is deterministic and unit-testable without a runtime.

pub mod artifact_key;
pub mod bundle;
pub mod error;
pub mod subdomain;
pub mod types;
