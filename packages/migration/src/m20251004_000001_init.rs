use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Sub,
    DisplayName,
    Email,
    AvatarUrl,
    Handicap,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Matches {
    Table,
    Id,
    HostId,
    CourseName,
    CourseRef,
    Location,
    MatchDate,
    TeeTime,
    MaxPlayers,
    EntryFeeCents,
    GameType,
    Rules,
    Status,
    JoinCode,
    CreatedAt,
    UpdatedAt,
    LockVersion,
}

#[derive(Iden)]
enum MatchPlayers {
    Table,
    Id,
    MatchId,
    UserId,
    Status,
    EntryFeePaid,
    JoinedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Holes {
    Table,
    Id,
    MatchId,
    HoleNumber,
    Par,
    DistanceYards,
    StrokeIndex,
    SkinValueCents,
    CarryoverFromPrevious,
    Completed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum HoleScores {
    Table,
    Id,
    HoleId,
    UserId,
    Score,
    IsSkinWinner,
    RecordedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Sub).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::Handicap).double().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_sub")
                    .table(Users::Table)
                    .col(Users::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // matches
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Matches::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Matches::HostId).big_integer().not_null())
                    .col(ColumnDef::new(Matches::CourseName).string().not_null())
                    .col(ColumnDef::new(Matches::CourseRef).string().null())
                    .col(ColumnDef::new(Matches::Location).string().null())
                    .col(ColumnDef::new(Matches::MatchDate).string_len(10).not_null())
                    .col(ColumnDef::new(Matches::TeeTime).string_len(5).not_null())
                    .col(
                        ColumnDef::new(Matches::MaxPlayers)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Matches::EntryFeeCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Matches::GameType)
                            .string_len(16)
                            .not_null()
                            .default("standard"),
                    )
                    .col(ColumnDef::new(Matches::Rules).json().null())
                    .col(
                        ColumnDef::new(Matches::Status)
                            .string_len(16)
                            .not_null()
                            .default("created"),
                    )
                    .col(ColumnDef::new(Matches::JoinCode).string_len(6).null())
                    .col(
                        ColumnDef::new(Matches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Matches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Matches::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_host_id")
                            .from(Matches::Table, Matches::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Terminal matches release their code (NULL), so uniqueness covers live matches only.
        manager
            .create_index(
                Index::create()
                    .name("ux_matches_join_code")
                    .table(Matches::Table)
                    .col(Matches::JoinCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_matches_status_created_at")
                    .table(Matches::Table)
                    .col(Matches::Status)
                    .col(Matches::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // match_players
        manager
            .create_table(
                Table::create()
                    .table(MatchPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchPlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(MatchPlayers::MatchId).big_integer().not_null())
                    .col(ColumnDef::new(MatchPlayers::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MatchPlayers::Status)
                            .string_len(16)
                            .not_null()
                            .default("joined"),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::EntryFeePaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchPlayers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_players_match_id")
                            .from(MatchPlayers::Table, MatchPlayers::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_players_user_id")
                            .from(MatchPlayers::Table, MatchPlayers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_match_players_match_user")
                    .table(MatchPlayers::Table)
                    .col(MatchPlayers::MatchId)
                    .col(MatchPlayers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // holes
        manager
            .create_table(
                Table::create()
                    .table(Holes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Holes::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Holes::MatchId).big_integer().not_null())
                    .col(ColumnDef::new(Holes::HoleNumber).small_integer().not_null())
                    .col(ColumnDef::new(Holes::Par).small_integer().not_null())
                    .col(ColumnDef::new(Holes::DistanceYards).integer().null())
                    .col(ColumnDef::new(Holes::StrokeIndex).small_integer().null())
                    .col(
                        ColumnDef::new(Holes::SkinValueCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Holes::CarryoverFromPrevious)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Holes::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Holes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Holes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_holes_match_id")
                            .from(Holes::Table, Holes::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_holes_match_number")
                    .table(Holes::Table)
                    .col(Holes::MatchId)
                    .col(Holes::HoleNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // hole_scores
        manager
            .create_table(
                Table::create()
                    .table(HoleScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HoleScores::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(HoleScores::HoleId).big_integer().not_null())
                    .col(ColumnDef::new(HoleScores::UserId).big_integer().not_null())
                    .col(ColumnDef::new(HoleScores::Score).small_integer().not_null())
                    .col(
                        ColumnDef::new(HoleScores::IsSkinWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HoleScores::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hole_scores_hole_id")
                            .from(HoleScores::Table, HoleScores::HoleId)
                            .to(Holes::Table, Holes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hole_scores_user_id")
                            .from(HoleScores::Table, HoleScores::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_hole_scores_hole_user")
                    .table(HoleScores::Table)
                    .col(HoleScores::HoleId)
                    .col(HoleScores::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order; indexes go with their tables
        manager
            .drop_table(Table::drop().table(HoleScores::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Holes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MatchPlayers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
