use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// `{match_id}` path segment, parsed and required to be positive.
///
/// Existence is checked by the service so that error precedence stays in
/// one place.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MatchId(pub i64);

impl MatchId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id = raw.parse::<i64>().map_err(|_| {
            AppError::bad_request(ErrorCode::InvalidMatchId, format!("Invalid match id: {raw}"))
        })?;
        if id <= 0 {
            return Err(AppError::bad_request(
                ErrorCode::InvalidMatchId,
                format!("Match id must be positive, got: {id}"),
            ));
        }
        Ok(MatchId(id))
    }
}

impl FromRequest for MatchId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("match_id")
            .ok_or_else(|| {
                AppError::bad_request(ErrorCode::InvalidMatchId, "Missing match_id parameter")
            })
            .and_then(MatchId::parse);
        ready(result)
    }
}
