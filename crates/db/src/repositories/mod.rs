//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod invitation_repo;
pub mod published_site_repo;
pub mod user_repo;

pub use invitation_repo::InvitationRepo;
pub use published_site_repo::PublishedSiteRepo;
pub use user_repo::UserRepo;
