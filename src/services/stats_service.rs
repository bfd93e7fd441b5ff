//! Conteos para el dashboard del admin

use crate::dto::dashboard_dto::{AdminDashboard, StatusBreakdown, Totals};
use crate::models::{Account, Role, Route, RouteStatus, Truck, TruckStatus};

fn breakdown<K: PartialEq + Copy>(
    keys: &[K],
    label: impl Fn(&K) -> &'static str,
    items: impl Iterator<Item = K>,
) -> StatusBreakdown {
    let mut values = vec![0usize; keys.len()];
    for item in items {
        if let Some(index) = keys.iter().position(|k| *k == item) {
            values[index] += 1;
        }
    }
    StatusBreakdown {
        labels: keys.iter().map(|k| label(k).to_string()).collect(),
        values,
    }
}

pub fn truck_status_counts(trucks: &[Truck]) -> StatusBreakdown {
    breakdown(&TruckStatus::ALL[..], TruckStatus::as_str, trucks.iter().map(|t| t.status))
}

pub fn route_status_counts(routes: &[Route]) -> StatusBreakdown {
    breakdown(&RouteStatus::ALL[..], RouteStatus::as_str, routes.iter().map(|r| r.status))
}

pub fn accounts_by_role(accounts: &[Account]) -> StatusBreakdown {
    breakdown(&Role::ALL[..], Role::as_str, accounts.iter().map(|a| a.role))
}

pub fn admin_dashboard(accounts: &[Account], trucks: &[Truck], routes: &[Route]) -> AdminDashboard {
    AdminDashboard {
        totals: Totals {
            accounts: accounts.len(),
            trucks: trucks.len(),
            routes: routes.len(),
        },
        truck_status_counts: truck_status_counts(trucks),
        route_status_counts: route_status_counts(routes),
        accounts_by_role: accounts_by_role(accounts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteFields, TruckFields};

    fn truck(plate: &str, status: TruckStatus) -> Truck {
        Truck::from_fields(TruckFields {
            plate: plate.into(),
            status,
            cargo: None,
            driver_id: None,
            dispatcher_id: None,
        })
    }

    fn route(status: RouteStatus) -> Route {
        Route::from_fields(RouteFields {
            origin: "Santiago".into(),
            destination: "Valdivia".into(),
            status,
            truck_id: None,
        })
    }

    #[test]
    fn test_counts_keep_every_label_even_when_zero() {
        let trucks = vec![
            truck("AAAA11", TruckStatus::Disponible),
            truck("BBBB22", TruckStatus::Disponible),
            truck("CCCC33", TruckStatus::EnRuta),
        ];
        let counts = truck_status_counts(&trucks);
        assert_eq!(counts.labels, vec!["disponible", "en ruta", "mantenimiento"]);
        assert_eq!(counts.values, vec![2, 1, 0]);
    }

    #[test]
    fn test_admin_dashboard_totals() {
        let routes = vec![
            route(RouteStatus::Pending),
            route(RouteStatus::Pending),
            route(RouteStatus::Completed),
        ];
        let dashboard = admin_dashboard(&[], &[], &routes);
        assert_eq!(dashboard.totals.routes, 3);
        assert_eq!(dashboard.totals.accounts, 0);
        assert_eq!(dashboard.route_status_counts.values, vec![2, 0, 1]);
        assert_eq!(dashboard.accounts_by_role.values, vec![0, 0, 0]);
    }
}
