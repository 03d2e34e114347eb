//! Input checks shared by services. Each returns `Validation` with the kind
//! that names the offending field.

use time::macros::format_description;
use time::{Date, Time};

use crate::errors::domain::{DomainError, ValidationKind};

pub const MIN_HOLE: i16 = 1;
pub const MAX_HOLE: i16 = 18;
pub const MIN_PAR: i16 = 1;
pub const MAX_PAR: i16 = 6;
pub const DEFAULT_PAR: i16 = 4;
pub const MIN_PLAYERS: i16 = 2;
pub const MAX_PLAYERS: i16 = 8;
pub const JOIN_CODE_LEN: usize = 6;
pub const MAX_COURSE_NAME_LEN: usize = 200;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

pub fn hole_number(n: i16) -> Result<i16, DomainError> {
    if (MIN_HOLE..=MAX_HOLE).contains(&n) {
        Ok(n)
    } else {
        Err(DomainError::validation(
            ValidationKind::HoleNumber,
            format!("Hole number must be between {MIN_HOLE} and {MAX_HOLE}, got {n}"),
        ))
    }
}

pub fn score(strokes: i16) -> Result<i16, DomainError> {
    if strokes >= 1 {
        Ok(strokes)
    } else {
        Err(DomainError::validation(
            ValidationKind::Score,
            format!("Score must be at least 1, got {strokes}"),
        ))
    }
}

pub fn par(par: i16) -> Result<i16, DomainError> {
    if (MIN_PAR..=MAX_PAR).contains(&par) {
        Ok(par)
    } else {
        Err(DomainError::validation(
            ValidationKind::Par,
            format!("Par must be between {MIN_PAR} and {MAX_PAR}, got {par}"),
        ))
    }
}

/// Par from course data, falling back to 4 when missing or out of range.
pub fn par_or_default(par: Option<i64>) -> i16 {
    par.and_then(|p| i16::try_from(p).ok())
        .filter(|p| (MIN_PAR..=MAX_PAR).contains(p))
        .unwrap_or(DEFAULT_PAR)
}

pub fn join_code(code: &str) -> Result<&str, DomainError> {
    if code.len() == JOIN_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(DomainError::validation(
            ValidationKind::JoinCode,
            "Join code must be exactly 6 digits",
        ))
    }
}

pub fn match_date(raw: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    if raw.len() != 10 {
        return Err(match_input(format!("Date must be YYYY-MM-DD, got '{raw}'")));
    }
    Date::parse(raw, &format).map_err(|_| match_input(format!("Date must be YYYY-MM-DD, got '{raw}'")))
}

pub fn tee_time(raw: &str) -> Result<Time, DomainError> {
    let format = format_description!("[hour]:[minute]");
    if raw.len() != 5 {
        return Err(match_input(format!("Tee time must be HH:MM, got '{raw}'")));
    }
    Time::parse(raw, &format).map_err(|_| match_input(format!("Tee time must be HH:MM, got '{raw}'")))
}

pub fn max_players(n: i16) -> Result<i16, DomainError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        Ok(n)
    } else {
        Err(match_input(format!(
            "Max players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {n}"
        )))
    }
}

pub fn entry_fee(cents: i64) -> Result<i64, DomainError> {
    if cents >= 0 {
        Ok(cents)
    } else {
        Err(match_input("Entry fee cannot be negative"))
    }
}

pub fn course_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(match_input("Course name is required"));
    }
    if trimmed.chars().count() > MAX_COURSE_NAME_LEN {
        return Err(match_input(format!(
            "Course name must be at most {MAX_COURSE_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalized `(page, limit)`; both default when absent.
pub fn pagination(page: Option<u64>, limit: Option<u64>) -> Result<(u64, u64), DomainError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if page < 1 {
        return Err(DomainError::validation(
            ValidationKind::Pagination,
            "Page must be at least 1",
        ));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(DomainError::validation(
            ValidationKind::Pagination,
            format!("Limit must be between 1 and {MAX_PAGE_LIMIT}"),
        ));
    }
    Ok((page, limit))
}

fn match_input(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::MatchInput, detail)
}
