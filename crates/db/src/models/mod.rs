//! Entity model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Where needed, an update DTO (all `Option` fields) for patches

pub mod agency;
pub mod candidature;
pub mod investigator;
pub mod mandate;
pub mod notification;
pub mod rating;
pub mod user;
