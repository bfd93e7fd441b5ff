//! Services module
//!
//! Lógica de negocio sin HTTP: reglas de asignación, marcadores de mapa,
//! credenciales, conteos y datos de demostración.

pub mod assignment_service;
pub mod auth_service;
pub mod map_service;
pub mod seed_service;
pub mod stats_service;

pub use assignment_service::{Actor, Transition};
