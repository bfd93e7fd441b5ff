use serde::Serialize;
use uuid::Uuid;

use crate::models::RouteStatus;

// Marcador de mapa; coords = [lat, lon]
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub route_id: Uuid,
    pub plate: String,
    pub status: RouteStatus,
    pub origin: String,
    pub destination: String,
    pub coords: [f64; 2],
    pub simulated: bool,
}
