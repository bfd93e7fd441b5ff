//! Modelo de Truck
//!
//! Camiones de la flota. Cada camión tiene a lo sumo un chofer y un
//! despachador.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Estado operativo del camión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TruckStatus {
    #[serde(rename = "disponible")]
    Disponible,
    #[serde(rename = "en ruta")]
    EnRuta,
    #[serde(rename = "mantenimiento")]
    Mantenimiento,
}

#[derive(Debug, Error)]
#[error("estado de camión desconocido: '{0}'")]
pub struct UnknownTruckStatus(pub String);

impl TruckStatus {
    pub const ALL: [TruckStatus; 3] = [
        TruckStatus::Disponible,
        TruckStatus::EnRuta,
        TruckStatus::Mantenimiento,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TruckStatus::Disponible => "disponible",
            TruckStatus::EnRuta => "en ruta",
            TruckStatus::Mantenimiento => "mantenimiento",
        }
    }
}

impl fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruckStatus {
    type Err = UnknownTruckStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disponible" => Ok(TruckStatus::Disponible),
            "en ruta" | "en_ruta" => Ok(TruckStatus::EnRuta),
            "mantenimiento" => Ok(TruckStatus::Mantenimiento),
            _ => Err(UnknownTruckStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for TruckStatus {
    type Error = UnknownTruckStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Truck - mapea a la tabla trucks
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Truck {
    pub id: Uuid,
    pub plate: String,
    #[sqlx(try_from = "String")]
    pub status: TruckStatus,
    pub cargo: Option<String>,
    pub driver_id: Option<Uuid>,
    pub dispatcher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Campos editables de un camión, ya validados y normalizados
#[derive(Debug, Clone)]
pub struct TruckFields {
    pub plate: String,
    pub status: TruckStatus,
    pub cargo: Option<String>,
    pub driver_id: Option<Uuid>,
    pub dispatcher_id: Option<Uuid>,
}

impl Truck {
    pub fn from_fields(fields: TruckFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: fields.plate,
            status: fields.status,
            cargo: fields.cargo,
            driver_id: fields.driver_id,
            dispatcher_id: fields.dispatcher_id,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, fields: TruckFields) {
        self.plate = fields.plate;
        self.status = fields.status;
        self.cargo = fields.cargo;
        self.driver_id = fields.driver_id;
        self.dispatcher_id = fields.dispatcher_id;
    }

    pub fn is_driven_by(&self, account_id: Uuid) -> bool {
        self.driver_id == Some(account_id)
    }

    pub fn is_dispatched_by(&self, account_id: Uuid) -> bool {
        self.dispatcher_id == Some(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_status_accepts_both_spellings_of_en_ruta() {
        assert_eq!("en ruta".parse::<TruckStatus>().unwrap(), TruckStatus::EnRuta);
        assert_eq!("EN_RUTA".parse::<TruckStatus>().unwrap(), TruckStatus::EnRuta);
        assert!("averiado".parse::<TruckStatus>().is_err());
    }

    #[test]
    fn test_ownership_helpers() {
        let driver = Uuid::new_v4();
        let truck = Truck::from_fields(TruckFields {
            plate: "ABCD12".into(),
            status: TruckStatus::Disponible,
            cargo: None,
            driver_id: Some(driver),
            dispatcher_id: None,
        });
        assert!(truck.is_driven_by(driver));
        assert!(!truck.is_driven_by(Uuid::new_v4()));
        assert!(!truck.is_dispatched_by(driver));
    }
}
