//! DTOs for holes_sea adapter.

/// DTO for lazily creating a hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleCreate {
    pub match_id: i64,
    pub hole_number: i16,
    pub par: i16,
    pub distance_yards: Option<i32>,
    pub stroke_index: Option<i16>,
    pub skin_value_cents: i64,
}
