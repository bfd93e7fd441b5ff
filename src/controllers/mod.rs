//! Controladores: orquestan store y servicios para cada endpoint

pub mod admin_controller;
pub mod assignment_controller;
pub mod auth_controller;
pub mod dashboard_controller;
