//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean a las tablas
//! accounts, trucks, routes y tracking.

pub mod account;
pub mod route;
pub mod tracking;
pub mod truck;

pub use account::{Account, NewAccount, Role};
pub use route::{Route, RouteFields, RouteStatus};
pub use tracking::{Tracking, TrackingEvent};
pub use truck::{Truck, TruckFields, TruckStatus};
