use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "holes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "match_id")]
    pub match_id: i64,
    #[sea_orm(column_name = "hole_number", column_type = "SmallInteger")]
    pub hole_number: i16,
    #[sea_orm(column_type = "SmallInteger")]
    pub par: i16,
    #[sea_orm(column_name = "distance_yards")]
    pub distance_yards: Option<i32>,
    #[sea_orm(column_name = "stroke_index", column_type = "SmallInteger", nullable)]
    pub stroke_index: Option<i16>,
    #[sea_orm(column_name = "skin_value_cents")]
    pub skin_value_cents: i64,
    #[sea_orm(column_name = "carryover_from_previous")]
    pub carryover_from_previous: bool,
    pub completed: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchId",
        to = "super::matches::Column::Id",
        on_delete = "Cascade"
    )]
    Match,
    #[sea_orm(has_many = "super::hole_scores::Entity")]
    HoleScores,
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::hole_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HoleScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
