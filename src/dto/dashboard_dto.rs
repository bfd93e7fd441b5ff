//! View-models de los dashboards
//!
//! Lo que una plantilla recibiría para pintar cada pantalla.

use serde::Serialize;

use super::account_dto::AccountResponse;
use crate::models::{Route, Tracking, Truck};

// Dashboard del chofer
#[derive(Debug, Serialize)]
pub struct DriverDashboard {
    pub account: AccountResponse,
    pub truck: Option<Truck>,
    pub assigned_routes: Vec<Route>,
    pub available_routes: Vec<Route>,
}

// Dashboard del despachador
#[derive(Debug, Serialize)]
pub struct DispatcherDashboard {
    pub account: AccountResponse,
    pub fleet: Vec<Truck>,
    pub pending_routes: Vec<Route>,
    pub fleet_routes: Vec<Route>,
}

// Formulario de asignación de camión a una ruta
#[derive(Debug, Serialize)]
pub struct AssignmentForm {
    pub route: Route,
    pub candidate_trucks: Vec<Truck>,
}

// Serie para un gráfico de barras o torta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub accounts: usize,
    pub trucks: usize,
    pub routes: usize,
}

// Dashboard del admin
#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub totals: Totals,
    pub truck_status_counts: StatusBreakdown,
    pub route_status_counts: StatusBreakdown,
    pub accounts_by_role: StatusBreakdown,
}

// Opciones para los selects del formulario de camión
#[derive(Debug, Serialize)]
pub struct TruckForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck: Option<Truck>,
    pub statuses: Vec<&'static str>,
    pub drivers: Vec<AccountResponse>,
    pub dispatchers: Vec<AccountResponse>,
}

// Opciones para el formulario de ruta
#[derive(Debug, Serialize)]
pub struct RouteForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    pub statuses: Vec<&'static str>,
    pub trucks: Vec<Truck>,
    pub cities: Vec<&'static str>,
}

// Historial de una ruta
#[derive(Debug, Serialize)]
pub struct RouteHistory {
    pub route: Route,
    pub tracking: Vec<Tracking>,
}
