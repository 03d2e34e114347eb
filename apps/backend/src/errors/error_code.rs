//! Error codes for the skins backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Every code
//! is SCREAMING_SNAKE_CASE and maps 1:1 to the string in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    Forbidden,
    ForbiddenUserNotFound,
    /// Operation is reserved for the match host
    NotHost,
    /// Caller holds no joined membership in the match
    NotAMember,
    HostCannotLeave,
    MembershipRemoved,

    // Request Validation
    InvalidMatchId,
    InvalidHoleNumber,
    InvalidScore,
    InvalidPar,
    InvalidJoinCode,
    InvalidMatchInput,
    InvalidRules,
    InvalidPagination,
    ValidationError,
    BadRequest,

    // Resource Not Found
    MatchNotFound,
    UserNotFound,
    MembershipNotFound,
    CourseNotFound,
    TeeNotFound,
    ClubNotFound,
    NotFound,

    // Business Logic Conflicts
    /// Transition or operation not allowed from the current status
    InvalidState,
    MatchFull,
    AlreadyJoined,
    ScoreAlreadyRecorded,
    JoinCodeConflict,
    OptimisticLock,
    Conflict,

    // Collaborators
    UpstreamUnavailable,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    UniqueViolation,
    FkViolation,
    CheckViolation,
    RecordNotFound,
    Internal,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// Canonical string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::NotHost => "NOT_HOST",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::HostCannotLeave => "HOST_CANNOT_LEAVE",
            Self::MembershipRemoved => "MEMBERSHIP_REMOVED",

            Self::InvalidMatchId => "INVALID_MATCH_ID",
            Self::InvalidHoleNumber => "INVALID_HOLE_NUMBER",
            Self::InvalidScore => "INVALID_SCORE",
            Self::InvalidPar => "INVALID_PAR",
            Self::InvalidJoinCode => "INVALID_JOIN_CODE",
            Self::InvalidMatchInput => "INVALID_MATCH_INPUT",
            Self::InvalidRules => "INVALID_RULES",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MembershipNotFound => "MEMBERSHIP_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::TeeNotFound => "TEE_NOT_FOUND",
            Self::ClubNotFound => "CLUB_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::InvalidState => "INVALID_STATE",
            Self::MatchFull => "MATCH_FULL",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::ScoreAlreadyRecorded => "SCORE_ALREADY_RECORDED",
            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
