//! Repository functions for the domain layer.
//!
//! Repos wrap the SeaORM adapters, convert rows into domain structs and map
//! `DbErr` into `DomainError`.

pub mod holes;
pub mod matches;
pub mod memberships;
pub mod scores;
pub mod users;
