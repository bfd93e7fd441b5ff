use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Account, Role};
use crate::utils::validation::USERNAME_REGEX;

// Request para crear una cuenta desde el panel
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(regex = "USERNAME_REGEX")]
    pub username: String,
    #[validate(length(min = 4, max = 100))]
    pub password: String,
    pub role: String,
}

// Response de cuenta (sin password)
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            created_at: account.created_at,
        }
    }
}
