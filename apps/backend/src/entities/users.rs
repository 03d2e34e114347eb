use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub sub: String,
    #[sea_orm(column_name = "display_name")]
    pub display_name: String,
    pub email: Option<String>,
    #[sea_orm(column_name = "avatar_url")]
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub handicap: Option<f64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,
    #[sea_orm(has_many = "super::hole_scores::Entity")]
    HoleScores,
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::hole_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HoleScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
