use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::PLATE_REGEX;

// Request para crear o editar un camión
#[derive(Debug, Deserialize, Validate)]
pub struct TruckRequest {
    #[validate(regex = "PLATE_REGEX")]
    pub plate: String,
    // "disponible" si no viene
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub cargo: Option<String>,
    pub driver_id: Option<Uuid>,
    pub dispatcher_id: Option<Uuid>,
}
