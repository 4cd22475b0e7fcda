use serde::{Deserialize, Serialize};

use crate::models::user::PublicUser;

// Fields are optional so a missing one is reported as a 400, not a parse failure.

// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Shared by register, login and me
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
