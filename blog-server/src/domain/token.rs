use chrono::{DateTime, Utc};

/// Server-side record of an issued token. A token is only honoured while its row exists.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
