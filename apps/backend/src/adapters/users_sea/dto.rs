//! DTOs for users_sea adapter.

/// DTO for creating a user row keyed by external `sub`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCreate {
    pub sub: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub handicap: Option<f64>,
}

impl UserCreate {
    pub fn new(sub: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            display_name: display_name.into(),
            email: None,
            avatar_url: None,
            handicap: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_handicap(mut self, handicap: Option<f64>) -> Self {
        self.handicap = handicap;
        self
    }
}
