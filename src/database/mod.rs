//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL y el DDL de arranque.

pub mod connection;
pub mod schema;

pub use connection::connect;
