use jsonwebtoken::Algorithm;

/// Default lifetime of tokens minted by [`crate::auth::jwt::mint_access_token`].
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 15 * 60;

/// JWT verification settings plus how unknown users are treated.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret shared with the identity provider
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub token_ttl_secs: i64,
    /// Create a users row on first sight of a valid token's `sub`
    pub auto_provision_users: bool,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            auto_provision_users: false,
        }
    }

    pub fn with_auto_provision(mut self, enabled: bool) -> Self {
        self.auto_provision_users = enabled;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
