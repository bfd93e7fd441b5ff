//! Modelo de Route
//!
//! Rutas origen-destino con su estado de avance. El vocabulario de
//! estados es canónico (`pendiente`, `en_progreso`, `completada`); los
//! alias heredados se aceptan solo al parsear.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Estado de la ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completada")]
    Completed,
}

#[derive(Debug, Error)]
#[error("estado de ruta no soportado: '{0}'")]
pub struct UnsupportedRouteStatus(pub String);

impl RouteStatus {
    pub const ALL: [RouteStatus; 3] = [
        RouteStatus::Pending,
        RouteStatus::InProgress,
        RouteStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "pendiente",
            RouteStatus::InProgress => "en_progreso",
            RouteStatus::Completed => "completada",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completed)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = UnsupportedRouteStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(RouteStatus::Pending),
            "en_progreso" | "en progreso" | "en curso" | "en_curso" => Ok(RouteStatus::InProgress),
            "completada" | "finalizada" | "completed" => Ok(RouteStatus::Completed),
            _ => Err(UnsupportedRouteStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for RouteStatus {
    type Error = UnsupportedRouteStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Route - mapea a la tabla routes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    #[sqlx(try_from = "String")]
    pub status: RouteStatus,
    pub truck_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Campos editables de una ruta desde el panel de administración
#[derive(Debug, Clone)]
pub struct RouteFields {
    pub origin: String,
    pub destination: String,
    pub status: RouteStatus,
    pub truck_id: Option<Uuid>,
}

impl Route {
    pub fn from_fields(fields: RouteFields) -> Self {
        let started_at = match fields.status {
            RouteStatus::InProgress => Some(Utc::now()),
            _ => None,
        };
        Self {
            id: Uuid::new_v4(),
            origin: fields.origin,
            destination: fields.destination,
            status: fields.status,
            truck_id: fields.truck_id,
            started_at,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, fields: RouteFields) {
        if fields.status != self.status {
            self.started_at = match fields.status {
                RouteStatus::InProgress => Some(Utc::now()),
                _ => None,
            };
        }
        self.origin = fields.origin;
        self.destination = fields.destination;
        self.status = fields.status;
        self.truck_id = fields.truck_id;
    }

    /// Pendiente y sin camión: la única forma reclamable o asignable
    pub fn is_open(&self) -> bool {
        self.status == RouteStatus::Pending && self.truck_id.is_none()
    }
}
