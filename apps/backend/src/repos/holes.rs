//! Hole repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::holes_sea as holes_adapter;
use crate::domain::skins::HoleState;
use crate::entities::holes;
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use crate::adapters::holes_sea::HoleCreate;

/// Hole domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hole {
    pub id: i64,
    pub match_id: i64,
    pub hole_number: i16,
    pub par: i16,
    pub distance_yards: Option<i32>,
    pub stroke_index: Option<i16>,
    pub skin_value_cents: i64,
    pub carryover_from_previous: bool,
    pub completed: bool,
}

impl Hole {
    pub fn state(&self) -> HoleState {
        HoleState {
            hole_number: self.hole_number,
            carryover: self.carryover_from_previous,
            completed: self.completed,
        }
    }
}

impl From<holes::Model> for Hole {
    fn from(model: holes::Model) -> Self {
        Self {
            id: model.id,
            match_id: model.match_id,
            hole_number: model.hole_number,
            par: model.par,
            distance_yards: model.distance_yards,
            stroke_index: model.stroke_index,
            skin_value_cents: model.skin_value_cents,
            carryover_from_previous: model.carryover_from_previous,
            completed: model.completed,
        }
    }
}

/// Create the hole unless it exists, then read back whichever row won.
///
/// Returns the hole and whether this call created it.
pub async fn ensure_hole<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: HoleCreate,
) -> Result<(Hole, bool), DomainError> {
    let (match_id, hole_number) = (dto.match_id, dto.hole_number);
    let inserted = holes_adapter::insert_if_absent(conn, dto).await?;
    let hole = holes_adapter::find_by_number(conn, match_id, hole_number)
        .await?
        .ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("hole {hole_number} of match {match_id} vanished after insert"),
            )
        })?;
    Ok((Hole::from(hole), inserted == 1))
}

pub async fn find_by_number<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    hole_number: i16,
) -> Result<Option<Hole>, DomainError> {
    let row = holes_adapter::find_by_number(conn, match_id, hole_number).await?;
    Ok(row.map(Hole::from))
}

pub async fn find_all_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<Hole>, DomainError> {
    let rows = holes_adapter::find_all_by_match(conn, match_id).await?;
    Ok(rows.into_iter().map(Hole::from).collect())
}

pub async fn set_resolution<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    carryover: bool,
    completed: bool,
) -> Result<(), DomainError> {
    holes_adapter::update_resolution(conn, hole_id, carryover, completed).await?;
    Ok(())
}

pub async fn set_stake<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    hole_id: i64,
    skin_value_cents: i64,
) -> Result<(), DomainError> {
    holes_adapter::update_stake(conn, hole_id, skin_value_cents).await?;
    Ok(())
}
