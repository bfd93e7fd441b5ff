//! DTOs de entrada y salida de la API

pub mod account_dto;
pub mod auth_dto;
pub mod dashboard_dto;
pub mod map_dto;
pub mod route_dto;
pub mod truck_dto;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}
