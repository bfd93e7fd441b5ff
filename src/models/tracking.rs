//! Modelo de Tracking
//!
//! Historial de eventos por ruta. Se escribe una fila por transición.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Evento que originó la fila de tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingEvent {
    Reclamada,
    Asignada,
    Reanudada,
    Completada,
}

impl TrackingEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingEvent::Reclamada => "reclamada",
            TrackingEvent::Asignada => "asignada",
            TrackingEvent::Reanudada => "reanudada",
            TrackingEvent::Completada => "completada",
        }
    }
}

impl fmt::Display for TrackingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking - mapea a la tabla tracking
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tracking {
    pub id: Uuid,
    pub route_id: Uuid,
    pub location: String,
    pub event: String,
    pub timestamp: DateTime<Utc>,
}

impl Tracking {
    pub fn new(route_id: Uuid, location: impl Into<String>, event: TrackingEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            location: location.into(),
            event: event.as_str().to_string(),
            timestamp: Utc::now(),
        }
    }
}
