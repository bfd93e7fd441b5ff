use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Request para crear o editar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct RouteRequest {
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub origin: String,
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub destination: String,
    // "pendiente" si no viene
    pub status: Option<String>,
    pub truck_id: Option<Uuid>,
}
