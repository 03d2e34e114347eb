//! DTOs for hole_scores_sea adapter.

/// DTO for a single stroke entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCreate {
    pub hole_id: i64,
    pub user_id: i64,
    pub score: i16,
}
