use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub redirect_to: &'static str,
}

impl LoginResponse {
    pub fn new(token: String, username: String, role: Role) -> Self {
        Self {
            token,
            username,
            role,
            redirect_to: role.dashboard_path(),
        }
    }
}

// Descriptor del formulario de login (GET /login sin sesión)
#[derive(Debug, Serialize)]
pub struct LoginForm {
    pub action: &'static str,
    pub method: &'static str,
    pub fields: [&'static str; 2],
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            action: "/login",
            method: "POST",
            fields: ["username", "password"],
        }
    }
}
