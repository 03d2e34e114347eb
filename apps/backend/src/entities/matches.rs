use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "nassau")]
    Nassau,
    #[sea_orm(string_value = "wolf")]
    Wolf,
    #[sea_orm(string_value = "vegas")]
    Vegas,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "host_id")]
    pub host_id: i64,
    #[sea_orm(column_name = "course_name")]
    pub course_name: String,
    #[sea_orm(column_name = "course_ref")]
    pub course_ref: Option<String>,
    pub location: Option<String>,
    #[sea_orm(column_name = "match_date")]
    pub match_date: String,
    #[sea_orm(column_name = "tee_time")]
    pub tee_time: String,
    #[sea_orm(column_name = "max_players", column_type = "SmallInteger")]
    pub max_players: i16,
    #[sea_orm(column_name = "entry_fee_cents")]
    pub entry_fee_cents: i64,
    #[sea_orm(column_name = "game_type")]
    pub game_type: GameType,
    #[sea_orm(column_type = "Json", nullable)]
    pub rules: Option<Json>,
    pub status: MatchStatus,
    #[sea_orm(column_name = "join_code")]
    pub join_code: Option<String>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostId",
        to = "super::users::Column::Id"
    )]
    Host,
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,
    #[sea_orm(has_many = "super::holes::Entity")]
    Holes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::holes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
