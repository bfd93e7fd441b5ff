//! Máquina de estados de asignación
//!
//! Reglas puras: reciben una foto de la ruta, el camión y el actor, y
//! deciden qué transición corresponde o por qué se rechaza. La escritura
//! la hace el controlador mediante las operaciones atómicas del store,
//! que vuelven a comprobar la condición en el momento de escribir.
//!
//! ```text
//! pendiente ──(reclamar | asignar)──▶ en_progreso ──(completar)──▶ completada
//!     │                                   ▲
//!     └──── (camión ya vinculado) ─(reanudar)
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Role, Route, RouteStatus, TrackingEvent, Truck};
use crate::utils::errors::{
    estado_no_soportado, no_autorizado, ruta_no_disponible, AppError, AppResult, SIN_CAMION,
};

/// Identidad que ejecuta la acción
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Transición aprobada, lista para aplicarse sobre el store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Chofer toma una ruta libre con su único camión
    Claim { truck_id: Uuid },
    /// Despachador asigna un camión de su flota a una ruta libre
    Assign { truck_id: Uuid },
    /// Chofer retoma una ruta ya vinculada a su camión
    Resume { truck_id: Uuid },
    /// Chofer cierra una ruta vinculada a su camión
    Complete { truck_id: Uuid },
}

impl Transition {
    pub fn truck_id(&self) -> Uuid {
        match *self {
            Transition::Claim { truck_id }
            | Transition::Assign { truck_id }
            | Transition::Resume { truck_id }
            | Transition::Complete { truck_id } => truck_id,
        }
    }

    pub fn target_status(&self) -> RouteStatus {
        match self {
            Transition::Complete { .. } => RouteStatus::Completed,
            _ => RouteStatus::InProgress,
        }
    }

    /// Marca de inicio que debe quedar en la ruta tras la transición
    pub fn started_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Transition::Complete { .. } => None,
            _ => Some(now),
        }
    }

    /// Las que requieren una ruta libre se aplican con bind_open_route
    pub fn binds_truck(&self) -> bool {
        matches!(self, Transition::Claim { .. } | Transition::Assign { .. })
    }

    pub fn event(&self) -> TrackingEvent {
        match self {
            Transition::Claim { .. } => TrackingEvent::Reclamada,
            Transition::Assign { .. } => TrackingEvent::Asignada,
            Transition::Resume { .. } => TrackingEvent::Reanudada,
            Transition::Complete { .. } => TrackingEvent::Completada,
        }
    }

    /// Ciudad que se registra en el historial
    pub fn location<'a>(&self, route: &'a Route) -> &'a str {
        match self {
            Transition::Complete { .. } => &route.destination,
            _ => &route.origin,
        }
    }
}

fn require_role(actor: &Actor, role: Role) -> AppResult<()> {
    if actor.role != role {
        return Err(no_autorizado());
    }
    Ok(())
}

/// Chofer reclama una ruta pendiente sin camión.
///
/// `actor_trucks` viene de `trucks_by_driver(actor.id)`.
pub fn plan_claim(actor: &Actor, route: &Route, actor_trucks: &[Truck]) -> AppResult<Transition> {
    require_role(actor, Role::Driver)?;

    let truck = match actor_trucks {
        [truck] => truck,
        [] => return Err(AppError::BadRequest(SIN_CAMION.to_string())),
        _ => {
            return Err(AppError::BadRequest(
                "Debes tener exactamente un camión asignado".to_string(),
            ))
        }
    };
    debug_assert!(truck.is_driven_by(actor.id));
    if !route.is_open() {
        return Err(ruta_no_disponible());
    }

    Ok(Transition::Claim { truck_id: truck.id })
}

/// Despachador asigna uno de sus camiones a una ruta pendiente sin camión
pub fn plan_assign(actor: &Actor, route: &Route, truck: &Truck) -> AppResult<Transition> {
    require_role(actor, Role::Dispatcher)?;

    if !truck.is_dispatched_by(actor.id) {
        return Err(no_autorizado());
    }
    if !route.is_open() {
        return Err(ruta_no_disponible());
    }

    Ok(Transition::Assign { truck_id: truck.id })
}

/// Chofer pide un estado por nombre (`en_progreso` o `completada`)
///
/// `route_truck` es el camión vinculado a la ruta, si lo hay. El vínculo
/// camión-chofer es el único control de acceso a nivel de ruta.
pub fn plan_status_change(
    actor: &Actor,
    route: &Route,
    route_truck: Option<&Truck>,
    requested: &str,
) -> AppResult<Transition> {
    require_role(actor, Role::Driver)?;

    let requested: RouteStatus = requested.parse().map_err(|_| estado_no_soportado())?;

    let truck = match route_truck {
        Some(truck) if route.truck_id == Some(truck.id) && truck.is_driven_by(actor.id) => truck,
        _ => return Err(no_autorizado()),
    };
    if route.status.is_terminal() {
        return Err(ruta_no_disponible());
    }

    match requested {
        RouteStatus::InProgress => Ok(Transition::Resume { truck_id: truck.id }),
        RouteStatus::Completed => Ok(Transition::Complete { truck_id: truck.id }),
        RouteStatus::Pending => Err(estado_no_soportado()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteFields, TruckFields, TruckStatus};
    use axum::http::StatusCode;

    fn driver() -> Actor {
        Actor { id: Uuid::new_v4(), role: Role::Driver }
    }

    fn dispatcher() -> Actor {
        Actor { id: Uuid::new_v4(), role: Role::Dispatcher }
    }

    fn truck_for(driver: Option<Uuid>, dispatcher: Option<Uuid>) -> Truck {
        Truck::from_fields(TruckFields {
            plate: "ABCD12".into(),
            status: TruckStatus::Disponible,
            cargo: None,
            driver_id: driver,
            dispatcher_id: dispatcher,
        })
    }

    fn route(status: RouteStatus, truck_id: Option<Uuid>) -> Route {
        Route::from_fields(RouteFields {
            origin: "Santiago".into(),
            destination: "Temuco".into(),
            status,
            truck_id,
        })
    }

    #[test]
    fn test_claim_without_truck_is_bad_request() {
        let actor = driver();
        let err = plan_claim(&actor, &route(RouteStatus::Pending, None), &[]).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains(SIN_CAMION));
    }

    #[test]
    fn test_claim_with_two_trucks_is_bad_request() {
        let actor = driver();
        let trucks = [truck_for(Some(actor.id), None), truck_for(Some(actor.id), None)];
        let err = plan_claim(&actor, &route(RouteStatus::Pending, None), &trucks).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_claim_open_route_binds_own_truck() {
        let actor = driver();
        let truck = truck_for(Some(actor.id), None);
        let transition =
            plan_claim(&actor, &route(RouteStatus::Pending, None), std::slice::from_ref(&truck))
                .unwrap();

        assert_eq!(transition, Transition::Claim { truck_id: truck.id });
        assert_eq!(transition.target_status(), RouteStatus::InProgress);
        assert!(transition.binds_truck());
        assert!(transition.started_at(Utc::now()).is_some());
    }

    #[test]
    fn test_claim_rejects_bound_or_started_routes() {
        let actor = driver();
        let truck = truck_for(Some(actor.id), None);
        let trucks = std::slice::from_ref(&truck);

        let bound = route(RouteStatus::Pending, Some(Uuid::new_v4()));
        assert_eq!(plan_claim(&actor, &bound, trucks).unwrap_err().status_code(), StatusCode::BAD_REQUEST);

        let started = route(RouteStatus::InProgress, None);
        assert!(plan_claim(&actor, &started, trucks).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_claim_with_foreign_truck_list_trips_debug_assert() {
        let actor = driver();
        let foreign = truck_for(Some(Uuid::new_v4()), None);
        let _ = plan_claim(&actor, &route(RouteStatus::Pending, None), std::slice::from_ref(&foreign));
    }

    #[test]
    fn test_claim_requires_driver_role() {
        let actor = dispatcher();
        let err = plan_claim(&actor, &route(RouteStatus::Pending, None), &[]).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_assign_outside_fleet_is_forbidden() {
        let actor = dispatcher();
        let foreign = truck_for(None, Some(Uuid::new_v4()));
        let err = plan_assign(&actor, &route(RouteStatus::Pending, None), &foreign).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_assign_own_truck_to_open_route() {
        let actor = dispatcher();
        let own = truck_for(None, Some(actor.id));
        let transition = plan_assign(&actor, &route(RouteStatus::Pending, None), &own).unwrap();
        assert_eq!(transition, Transition::Assign { truck_id: own.id });
        assert_eq!(transition.event(), TrackingEvent::Asignada);
    }

    #[test]
    fn test_assign_taken_route_is_unavailable() {
        let actor = dispatcher();
        let own = truck_for(None, Some(actor.id));
        let taken = route(RouteStatus::InProgress, Some(Uuid::new_v4()));
        let err = plan_assign(&actor, &taken, &own).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_only_bound_driver_can_complete() {
        let owner = driver();
        let truck = truck_for(Some(owner.id), None);
        let active = route(RouteStatus::InProgress, Some(truck.id));

        let done = plan_status_change(&owner, &active, Some(&truck), "completada").unwrap();
        assert_eq!(done, Transition::Complete { truck_id: truck.id });
        assert_eq!(done.target_status(), RouteStatus::Completed);
        assert!(done.started_at(Utc::now()).is_none());
        assert_eq!(done.location(&active), "Temuco");

        let stranger = driver();
        let err = plan_status_change(&stranger, &active, Some(&truck), "completada").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_resume_accepts_legacy_alias() {
        let owner = driver();
        let truck = truck_for(Some(owner.id), None);
        let bound = route(RouteStatus::Pending, Some(truck.id));
        let resumed = plan_status_change(&owner, &bound, Some(&truck), "en curso").unwrap();
        assert_eq!(resumed, Transition::Resume { truck_id: truck.id });
        assert_eq!(resumed.location(&bound), "Santiago");
    }

    #[test]
    fn test_unbound_route_cannot_be_resumed() {
        let owner = driver();
        let err = plan_status_change(&owner, &route(RouteStatus::Pending, None), None, "en_progreso")
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unsupported_status_strings() {
        let owner = driver();
        let truck = truck_for(Some(owner.id), None);
        let active = route(RouteStatus::InProgress, Some(truck.id));

        for requested in ["pendiente", "cancelada", ""] {
            let err = plan_status_change(&owner, &active, Some(&truck), requested).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "estado {:?}", requested);
        }
    }

    #[test]
    fn test_completed_route_is_terminal() {
        let owner = driver();
        let truck = truck_for(Some(owner.id), None);
        let done = route(RouteStatus::Completed, Some(truck.id));
        let err = plan_status_change(&owner, &done, Some(&truck), "en_progreso").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
