//! Modelo de Account
//!
//! Cuentas de acceso con su rol. El rol es un conjunto cerrado; la
//! base de datos lo guarda como texto y se parsea al leer la fila.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "chofer")]
    Driver,
    #[serde(rename = "despachador")]
    Dispatcher,
    #[serde(rename = "admin")]
    Admin,
}

#[derive(Debug, Error)]
#[error("rol desconocido: '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Dispatcher, Role::Driver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "chofer",
            Role::Dispatcher => "despachador",
            Role::Admin => "admin",
        }
    }

    /// Dashboard al que se redirige tras el login
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Driver => "/dashboard_chofer",
            Role::Dispatcher => "/dashboard_despachador",
            Role::Admin => "/dashboard_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "chofer" => Ok(Role::Driver),
            "despachador" => Ok(Role::Dispatcher),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Account - mapea a la tabla accounts
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar una cuenta nueva (password ya hasheada)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub role: Role,
    pub password_hash: String,
}

impl Account {
    pub fn from_new(new: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: new.username,
            role: new.role,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_its_db_string() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("supervisor".parse::<Role>().is_err());
        assert!(Role::try_from("Chofer".to_string()).is_err());
    }

    #[test]
    fn test_role_serializes_with_spanish_tag() {
        assert_eq!(serde_json::to_string(&Role::Dispatcher).unwrap(), "\"despachador\"");
    }
}
