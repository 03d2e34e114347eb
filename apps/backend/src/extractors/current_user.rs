use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::claims::BackendClaims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::repos::users::{self, User, UserCreate};
use crate::state::app_state::AppState;

/// The caller's users row, resolved from the `sub` of the verified token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub sub: String,
    pub display_name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            sub: user.sub,
            display_name: user.display_name,
        }
    }
}

/// Display name for a user created from token claims alone.
fn provisioned_name(claims: &BackendClaims) -> String {
    claims
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| {
            claims
                .email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .filter(|local| !local.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| claims.sub.clone())
}

async fn resolve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    claims: &BackendClaims,
    auto_provision: bool,
) -> Result<CurrentUser, AppError> {
    if let Some(user) = users::find_user_by_sub(conn, &claims.sub).await? {
        return Ok(CurrentUser::from(user));
    }
    if !auto_provision {
        return Err(AppError::forbidden_user_not_found());
    }

    let dto = UserCreate::new(claims.sub.clone(), provisioned_name(claims))
        .with_email(claims.email.clone());
    let (user, created) = users::ensure_user(conn, dto).await?;
    if created {
        info!(user_id = user.id, "user provisioned from token");
    }
    Ok(CurrentUser::from(user))
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<BackendClaims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;

            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let auto_provision = state.security.auto_provision_users;

            if let Some(shared) = SharedTxn::from_req(&req) {
                resolve(shared.transaction(), &claims, auto_provision).await
            } else {
                let db = require_db(state)?;
                resolve(db, &claims, auto_provision).await
            }
        })
    }
}
