//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod agency_repo;
pub mod candidature_repo;
pub mod investigator_repo;
pub mod mandate_repo;
pub mod notification_repo;
pub mod rating_repo;
pub mod refresh_token_repo;
pub mod user_repo;

pub use agency_repo::AgencyRepo;
pub use candidature_repo::CandidatureRepo;
pub use investigator_repo::InvestigatorRepo;
pub use mandate_repo::MandateRepo;
pub use notification_repo::NotificationRepo;
pub use rating_repo::RatingRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use user_repo::UserRepo;
