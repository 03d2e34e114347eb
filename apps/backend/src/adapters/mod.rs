//! SeaORM adapters, one per table. Functions return `DbErr`.

pub mod hole_scores_sea;
pub mod holes_sea;
pub mod matches_sea;
pub mod memberships_sea;
pub mod users_sea;
