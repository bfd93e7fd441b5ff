//! fleet_dispatch
//!
//! Despacho de flota por roles: choferes, despachadores y administradores
//! gestionan camiones y rutas sobre un store relacional.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
