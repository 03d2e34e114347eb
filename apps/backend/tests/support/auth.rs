//! JWT helpers for tests

use std::time::{Duration, SystemTime};

use skins_backend::auth::jwt::mint_access_token;
use skins_backend::state::security_config::SecurityConfig;

pub fn mint_test_token(sub: &str, sec: &SecurityConfig) -> String {
    mint_access_token(sub, None, SystemTime::now(), sec).expect("should mint token successfully")
}

/// Full Authorization header value including the "Bearer " prefix.
pub fn bearer_header(sub: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, sec))
}

pub fn bearer_header_with_email(sub: &str, email: &str, sec: &SecurityConfig) -> String {
    let token = mint_access_token(sub, Some(email), SystemTime::now(), sec)
        .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// A token that expired well before now.
pub fn mint_expired_token(sub: &str, sec: &SecurityConfig) -> String {
    let past_time = SystemTime::now()
        .checked_sub(Duration::from_secs(7200))
        .unwrap();
    mint_access_token(sub, None, past_time, sec).expect("should mint expired token successfully")
}
