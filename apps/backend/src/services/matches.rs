//! Match creation, listing, host edits and the status lifecycle.

use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::holes_sea::HoleCreate;
use crate::config::app::MatchConfig;
use crate::domain::lifecycle::{self, MatchAction};
use crate::domain::rules::MatchRules;
use crate::domain::validation::{self, MAX_HOLE, MIN_HOLE};
use crate::entities::matches::{GameType, MatchStatus};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};
use crate::repos::matches::{self as matches_repo, Match, MatchCreate, MatchListFilter, MatchUpdate};
use crate::repos::{holes, memberships};
use crate::services::courses::{course_display_name, find_tee, CourseCatalog};
use crate::services::projector::{self, MatchView};
use crate::services::scoring;
use crate::utils::join_code::generate_join_code;

fn default_max_players() -> i16 {
    4
}

/// Body of `POST /api/matches`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMatchInput {
    pub course_name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub date: String,
    pub tee_time: String,
    #[serde(default = "default_max_players")]
    pub max_players: i16,
    #[serde(default)]
    pub entry_fee_cents: i64,
    #[serde(default = "default_game_type")]
    pub game_type: GameType,
    #[serde(default)]
    pub rules: Option<Value>,
}

/// Body of `POST /api/matches/with-course`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWithCourseInput {
    pub course_id: String,
    pub tee_id: String,
    /// Overrides the location derived from the course
    #[serde(default)]
    pub location: Option<String>,
    pub date: String,
    pub tee_time: String,
    #[serde(default = "default_max_players")]
    pub max_players: i16,
    #[serde(default)]
    pub entry_fee_cents: i64,
    #[serde(default = "default_game_type")]
    pub game_type: GameType,
    #[serde(default)]
    pub rules: Option<Value>,
}

/// Body of `PUT /api/matches/{id}`; absent fields are left unchanged.
///
/// `location: null` clears the location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMatchInput {
    pub course_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    pub date: Option<String>,
    pub tee_time: Option<String>,
    pub max_players: Option<i16>,
    pub entry_fee_cents: Option<i64>,
    pub game_type: Option<GameType>,
    pub rules: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMatchesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<MatchStatus>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPage {
    pub matches: Vec<MatchView>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

fn default_game_type() -> GameType {
    GameType::Standard
}

/// Validated, normalized fields shared by both create paths.
struct NewMatch {
    course_name: String,
    course_ref: Option<String>,
    location: Option<String>,
    date: String,
    tee_time: String,
    max_players: i16,
    entry_fee_cents: i64,
    game_type: GameType,
    rules: MatchRules,
}

fn normalize_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

#[allow(clippy::too_many_arguments)]
fn validate_new(
    course_name: &str,
    location: Option<String>,
    date: &str,
    tee_time: &str,
    max_players: i16,
    entry_fee_cents: i64,
    game_type: GameType,
    rules: Option<&Value>,
) -> Result<NewMatch, DomainError> {
    let course_name = validation::course_name(course_name)?;
    validation::match_date(date)?;
    validation::tee_time(tee_time)?;
    let max_players = validation::max_players(max_players)?;
    let entry_fee_cents = validation::entry_fee(entry_fee_cents)?;
    let rules = MatchRules::parse(game_type, rules)?;

    Ok(NewMatch {
        course_name,
        course_ref: None,
        location: normalize_location(location),
        date: date.to_string(),
        tee_time: tee_time.to_string(),
        max_players,
        entry_fee_cents,
        game_type,
        rules,
    })
}

fn join_code_exhausted() -> DomainError {
    DomainError::conflict(
        ConflictKind::JoinCodeConflict,
        "Could not allocate a unique join code",
    )
}

/// Draw codes until one is not held by any match.
///
/// Each draw consumes one unit of `attempts_left`; running out is a
/// `Conflict(JoinCodeConflict)`.
pub async fn allocate_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    attempts_left: &mut u32,
    generator: &mut dyn FnMut() -> String,
) -> Result<String, DomainError> {
    while *attempts_left > 0 {
        *attempts_left -= 1;
        let code = generator();
        validation::join_code(&code)?;
        if !matches_repo::join_code_in_use(conn, &code).await? {
            return Ok(code);
        }
        debug!(remaining = *attempts_left, "join code collision");
    }
    Err(join_code_exhausted())
}

/// Insert the match with a fresh join code, retrying codes lost to a
/// concurrent insert against the same attempt limit.
async fn insert_match(
    txn: &DatabaseTransaction,
    host_id: i64,
    new: &NewMatch,
    cfg: &MatchConfig,
    generator: &mut dyn FnMut() -> String,
) -> Result<Match, DomainError> {
    let mut attempts_left = cfg.join_code_attempts;
    loop {
        let code = allocate_join_code(txn, &mut attempts_left, generator).await?;
        let dto = MatchCreate {
            host_id,
            course_name: new.course_name.clone(),
            course_ref: new.course_ref.clone(),
            location: new.location.clone(),
            match_date: new.date.clone(),
            tee_time: new.tee_time.clone(),
            max_players: new.max_players,
            entry_fee_cents: new.entry_fee_cents,
            game_type: new.game_type,
            rules: new.rules.to_value(),
            join_code: code,
        };
        if let Some(created) = matches_repo::create_match(txn, dto).await? {
            return Ok(created);
        }
        debug!(remaining = attempts_left, "join code taken at insert");
    }
}

/// Host membership goes in its own savepoint so a failure leaves the match intact.
async fn add_host_membership(txn: &DatabaseTransaction, match_id: i64, host_id: i64) {
    let result = async {
        let savepoint = txn.begin().await?;
        memberships::create_membership(&savepoint, match_id, host_id).await?;
        savepoint.commit().await?;
        Ok::<(), DomainError>(())
    }
    .await;

    if let Err(e) = result {
        warn!(match_id, host_id, error = %e, "host membership insert failed; match kept");
    }
}

async fn create_validated(
    txn: &DatabaseTransaction,
    host_id: i64,
    new: NewMatch,
    cfg: &MatchConfig,
    generator: &mut dyn FnMut() -> String,
) -> Result<Match, DomainError> {
    let created = insert_match(txn, host_id, &new, cfg, generator).await?;
    add_host_membership(txn, created.id, host_id).await;
    info!(
        match_id = created.id,
        host_id,
        game_type = ?created.game_type,
        "match created"
    );
    Ok(created)
}

pub async fn create_match(
    txn: &DatabaseTransaction,
    host_id: i64,
    input: CreateMatchInput,
    cfg: &MatchConfig,
) -> Result<MatchView, DomainError> {
    create_match_with_generator(txn, host_id, input, cfg, &mut generate_join_code).await
}

/// [`create_match`] with an explicit join code source.
pub async fn create_match_with_generator(
    txn: &DatabaseTransaction,
    host_id: i64,
    input: CreateMatchInput,
    cfg: &MatchConfig,
    generator: &mut dyn FnMut() -> String,
) -> Result<MatchView, DomainError> {
    let new = validate_new(
        &input.course_name,
        input.location,
        &input.date,
        &input.tee_time,
        input.max_players,
        input.entry_fee_cents,
        input.game_type,
        input.rules.as_ref(),
    )?;
    let created = create_validated(txn, host_id, new, cfg, generator).await?;
    projector::view_of(txn, created).await
}

/// Create a match from a catalog course and tee, seeding all 18 holes.
///
/// The catalog is read before anything is written.
pub async fn create_match_with_course(
    txn: &DatabaseTransaction,
    catalog: &dyn CourseCatalog,
    host_id: i64,
    input: CreateWithCourseInput,
    cfg: &MatchConfig,
) -> Result<MatchView, DomainError> {
    let course = catalog.get_course(&input.course_id).await?;
    let tee = find_tee(&course, &input.tee_id).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::MatchInput,
            format!(
                "Tee {} is not offered by course {}",
                input.tee_id, course.course_id
            ),
        )
    })?;

    let location = normalize_location(input.location).or_else(|| course.location());
    let mut new = validate_new(
        &course_display_name(&course, tee),
        location,
        &input.date,
        &input.tee_time,
        input.max_players,
        input.entry_fee_cents,
        input.game_type,
        input.rules.as_ref(),
    )?;
    new.course_ref = Some(format!("{}:{}", course.course_id, tee.tee_id));
    let entry_fee_cents = new.entry_fee_cents;

    let created = create_validated(txn, host_id, new, cfg, &mut generate_join_code).await?;

    for n in MIN_HOLE..=MAX_HOLE {
        holes::ensure_hole(
            txn,
            HoleCreate {
                match_id: created.id,
                hole_number: n,
                par: course.par_for_hole(n),
                distance_yards: tee.distance_yards(n),
                stroke_index: course.stroke_index_for_hole(n),
                skin_value_cents: entry_fee_cents,
            },
        )
        .await?;
    }
    info!(match_id = created.id, course_id = %course.course_id, tee_id = %tee.tee_id, "holes seeded from course");

    projector::view_of(txn, created).await
}

pub async fn get_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<MatchView, DomainError> {
    projector::match_view(conn, match_id).await
}

pub async fn list_matches<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    query: ListMatchesQuery,
) -> Result<MatchPage, DomainError> {
    let (page, limit) = validation::pagination(query.page, query.limit)?;
    if let Some(date) = query.date.as_deref() {
        validation::match_date(date)?;
    }

    let filter = MatchListFilter {
        page,
        limit,
        status: query.status,
        match_date: query.date,
    };
    let (rows, total) = matches_repo::list_matches(conn, filter).await?;

    let mut matches = Vec::with_capacity(rows.len());
    for m in rows {
        matches.push(projector::view_of(conn, m).await?);
    }

    Ok(MatchPage {
        matches,
        total,
        page,
        limit,
    })
}

/// Load the match and require `user_id` to be its host.
async fn require_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    user_id: i64,
) -> Result<Match, DomainError> {
    let m = matches_repo::require_match(conn, match_id).await?;
    if !m.is_host(user_id) {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotHost,
            "Only the match host can do that",
        ));
    }
    Ok(m)
}

pub async fn update_match(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
    input: UpdateMatchInput,
) -> Result<MatchView, DomainError> {
    let current = require_host(txn, match_id, user_id).await?;
    lifecycle::require_created(current.status, "edit")?;

    let game_type = input.game_type.unwrap_or(current.game_type);
    let rules = match input.rules.as_ref() {
        Some(submitted) => MatchRules::parse(game_type, Some(submitted))?,
        None if game_type != current.game_type => {
            MatchRules::parse(game_type, Some(&current.rules))?
        }
        None => current.parsed_rules()?,
    };

    let course_name = match input.course_name.as_deref() {
        Some(name) => validation::course_name(name)?,
        None => current.course_name,
    };
    let location = match input.location {
        Some(location) => normalize_location(location),
        None => current.location,
    };
    let match_date = match input.date {
        Some(date) => {
            validation::match_date(&date)?;
            date
        }
        None => current.match_date,
    };
    let tee_time = match input.tee_time {
        Some(tee_time) => {
            validation::tee_time(&tee_time)?;
            tee_time
        }
        None => current.tee_time,
    };
    let max_players = match input.max_players {
        Some(n) => validation::max_players(n)?,
        None => current.max_players,
    };
    let entry_fee_cents = match input.entry_fee_cents {
        Some(cents) => validation::entry_fee(cents)?,
        None => current.entry_fee_cents,
    };

    let joined = memberships::count_joined(txn, match_id).await?;
    if u64::try_from(max_players).unwrap_or(0) < joined {
        return Err(DomainError::validation(
            ValidationKind::MatchInput,
            format!("Max players cannot be below the {joined} players already joined"),
        ));
    }

    matches_repo::update_if_created(
        txn,
        match_id,
        MatchUpdate {
            course_name,
            location,
            match_date,
            tee_time,
            max_players,
            entry_fee_cents,
            game_type,
            rules: rules.to_value(),
        },
    )
    .await?;
    info!(match_id, user_id, "match updated");

    projector::match_view(txn, match_id).await
}

pub async fn delete_match(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<(), DomainError> {
    let current = require_host(txn, match_id, user_id).await?;
    lifecycle::require_created(current.status, "delete")?;
    matches_repo::delete_if_created(txn, match_id).await?;
    info!(match_id, user_id, "match deleted");
    Ok(())
}

async fn apply(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
    action: MatchAction,
) -> Result<Match, DomainError> {
    let current = require_host(txn, match_id, user_id).await?;
    let next = lifecycle::transition(current.status, action)?;
    matches_repo::transition_status(txn, match_id, current.status, next).await?;
    info!(
        match_id,
        user_id,
        from = current.status.as_str(),
        to = next.as_str(),
        "match status changed"
    );
    matches_repo::require_match(txn, match_id).await
}

/// `created -> active`. The entry fee is frozen from here, so stakes are repriced.
pub async fn start_match(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<MatchView, DomainError> {
    let started = apply(txn, match_id, user_id, MatchAction::Start).await?;
    scoring::reprice_holes(txn, &started).await?;
    projector::view_of(txn, started).await
}

pub async fn complete_match(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<MatchView, DomainError> {
    let completed = apply(txn, match_id, user_id, MatchAction::Complete).await?;
    projector::view_of(txn, completed).await
}

pub async fn cancel_match(
    txn: &DatabaseTransaction,
    match_id: i64,
    user_id: i64,
) -> Result<MatchView, DomainError> {
    let cancelled = apply(txn, match_id, user_id, MatchAction::Cancel).await?;
    projector::view_of(txn, cancelled).await
}
