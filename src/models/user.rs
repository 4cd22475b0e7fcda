use sqlx::FromRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    // Accounts created through an external provider may have no local password.
    pub password_hash: Option<String>,
}

/// Canonical form an email is stored and looked up under.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// What leaves the server about a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.user_name.clone(),
            email: user.user_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Grace@Church.ORG "), "grace@church.org");
    }
}
