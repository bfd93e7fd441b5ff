//! Marcadores de mapa simulados
//!
//! No hay telemetría: la posición se deriva de una tabla fija de ciudades.
//! Una ruta en progreso se dibuja cerca de su origen con un desplazamiento
//! aleatorio; una completada, exactamente en su destino. Cualquier ciudad
//! o estado sin representación se omite en silencio.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::dto::map_dto::MapMarker;
use crate::models::{Route, RouteStatus, Truck};

/// Tabla fija de ciudades (lat, lon)
pub const CITY_COORDINATES: [(&str, f64, f64); 10] = [
    ("Santiago", -33.4489, -70.6693),
    ("Valparaíso", -33.0472, -71.6127),
    ("Concepción", -36.8201, -73.0444),
    ("La Serena", -29.9027, -71.2519),
    ("Antofagasta", -23.6509, -70.3975),
    ("Rancagua", -34.1708, -70.7444),
    ("Talca", -35.4264, -71.6554),
    ("Temuco", -38.7359, -72.5904),
    ("Valdivia", -39.8142, -73.2459),
    ("Puerto Montt", -41.4689, -72.9411),
];

/// Minúsculas y sin tildes, para comparar nombres escritos a mano
fn fold_city(name: &str) -> String {
    deunicode::deunicode(name.trim()).to_lowercase()
}

/// Coordenadas de una ciudad conocida
pub fn city_coordinates(name: &str) -> Option<(f64, f64)> {
    let folded = fold_city(name);
    CITY_COORDINATES
        .iter()
        .find(|(city, _, _)| fold_city(city) == folded)
        .map(|&(_, lat, lon)| (lat, lon))
}

pub fn is_known_city(name: &str) -> bool {
    city_coordinates(name).is_some()
}

/// Marcador para una ruta, o `None` si no es representable
pub fn marker_for<R: Rng>(
    route: &Route,
    truck: &Truck,
    jitter_degrees: f64,
    rng: &mut R,
) -> Option<MapMarker> {
    let (city, simulated) = match route.status {
        RouteStatus::InProgress => (&route.origin, true),
        RouteStatus::Completed => (&route.destination, false),
        RouteStatus::Pending => return None,
    };

    if !is_known_city(&route.origin) || !is_known_city(&route.destination) {
        debug!(
            "🗺️ Ruta {} omitida: '{}' → '{}' fuera de la tabla",
            route.id, route.origin, route.destination
        );
        return None;
    }
    let (lat, lon) = city_coordinates(city)?;

    let coords = if simulated && jitter_degrees.is_finite() && jitter_degrees > 0.0 {
        [
            lat + rng.gen_range(-jitter_degrees..=jitter_degrees),
            lon + rng.gen_range(-jitter_degrees..=jitter_degrees),
        ]
    } else {
        [lat, lon]
    };

    Some(MapMarker {
        route_id: route.id,
        plate: truck.plate.clone(),
        status: route.status,
        origin: route.origin.clone(),
        destination: route.destination.clone(),
        coords,
        simulated,
    })
}

/// Marcadores para un conjunto de rutas; las rutas sin camión se omiten
pub fn build_markers<R: Rng>(
    routes: &[Route],
    trucks: &[Truck],
    jitter_degrees: f64,
    rng: &mut R,
) -> Vec<MapMarker> {
    let by_id: HashMap<Uuid, &Truck> = trucks.iter().map(|t| (t.id, t)).collect();

    routes
        .iter()
        .filter_map(|route| {
            let truck = route.truck_id.and_then(|id| by_id.get(&id))?;
            marker_for(route, truck, jitter_degrees, &mut *rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteFields, TruckFields, TruckStatus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn truck() -> Truck {
        Truck::from_fields(TruckFields {
            plate: "ABCD12".into(),
            status: TruckStatus::EnRuta,
            cargo: None,
            driver_id: None,
            dispatcher_id: None,
        })
    }

    fn route(origin: &str, destination: &str, status: RouteStatus, truck: &Truck) -> Route {
        Route::from_fields(RouteFields {
            origin: origin.into(),
            destination: destination.into(),
            status,
            truck_id: Some(truck.id),
        })
    }

    #[test]
    fn test_city_lookup_ignores_case_and_accents() {
        assert_eq!(city_coordinates("valparaiso"), city_coordinates("Valparaíso"));
        assert!(city_coordinates("  PUERTO MONTT ").is_some());
        assert!(city_coordinates("Punta Arenas").is_none());
        assert_eq!(CITY_COORDINATES.len(), 10);

        assert_eq!(city_coordinates("CONCEPCIÓN"), city_coordinates("Concepcion"));
        assert_eq!(city_coordinates("Valparaìso"), city_coordinates("valparaiso"));
        assert_eq!(fold_city("Ñuñoa"), "nunoa");
    }

    #[test]
    fn test_non_finite_jitter_falls_back_to_exact_origin() {
        let truck = truck();
        let route = route("Santiago", "Temuco", RouteStatus::InProgress, &truck);
        let mut rng = StdRng::seed_from_u64(7);
        let origin = city_coordinates("Santiago").map(|(lat, lon)| [lat, lon]);

        for jitter in [f64::INFINITY, f64::NAN, -1.0] {
            let marker = marker_for(&route, &truck, jitter, &mut rng).unwrap();
            assert_eq!(Some(marker.coords), origin);
        }
    }

    #[test]
    fn test_in_progress_marker_is_jittered_near_origin() {
        let truck = truck();
        let route = route("Santiago", "Temuco", RouteStatus::InProgress, &truck);
        let mut rng = StdRng::seed_from_u64(7);

        let marker = marker_for(&route, &truck, 0.05, &mut rng).unwrap();
        let (lat, lon) = city_coordinates("Santiago").unwrap();
        assert!(marker.simulated);
        assert!((marker.coords[0] - lat).abs() <= 0.05);
        assert!((marker.coords[1] - lon).abs() <= 0.05);
        assert_eq!(marker.plate, "ABCD12");
    }

    #[test]
    fn test_completed_marker_sits_on_destination() {
        let truck = truck();
        let route = route("Santiago", "Temuco", RouteStatus::Completed, &truck);
        let mut rng = StdRng::seed_from_u64(7);

        let marker = marker_for(&route, &truck, 0.05, &mut rng).unwrap();
        let (lat, lon) = city_coordinates("Temuco").unwrap();
        assert!(!marker.simulated);
        assert_eq!(marker.coords, [lat, lon]);
    }

    #[test]
    fn test_unknown_cities_and_pending_routes_are_skipped() {
        let truck = truck();
        let routes = vec![
            route("Santiago", "Temuco", RouteStatus::InProgress, &truck),
            route("Gotham", "Temuco", RouteStatus::InProgress, &truck),
            route("Santiago", "Metropolis", RouteStatus::Completed, &truck),
            route("Santiago", "Temuco", RouteStatus::Pending, &truck),
        ];
        let mut rng = StdRng::seed_from_u64(1);

        let markers = build_markers(&routes, std::slice::from_ref(&truck), 0.05, &mut rng);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].route_id, routes[0].id);
        assert!(markers.iter().all(|m| is_known_city(&m.origin) && is_known_city(&m.destination)));
    }

    #[test]
    fn test_routes_without_known_truck_are_skipped() {
        let truck = truck();
        let routes = vec![route("Santiago", "Temuco", RouteStatus::InProgress, &truck)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(build_markers(&routes, &[], 0.05, &mut rng).is_empty());
    }
}
