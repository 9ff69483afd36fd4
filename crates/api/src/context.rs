/// Authenticated identity for a request, derived from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user_id: i64,
    email: String,
}

impl CurrentUser {
    pub fn new(user_id: i64, email: String) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
