//! Request handlers.
//!
//! Handlers stay thin: they parse the request, delegate to the publisher
//! or a repository in `invita_db`, and map errors via [`AppError`]
//! (crate::error::AppError).

pub mod resolve;
pub mod sites;
