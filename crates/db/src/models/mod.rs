//! Database row structs and request DTOs.

pub mod invitation;
pub mod published_site;
pub mod user;
