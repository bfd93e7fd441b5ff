mod common;

use axum::http::StatusCode;
use common::TestApp;

use fleet_dispatch::models::{Role, RouteStatus, TruckStatus};
use fleet_dispatch::repositories::FleetStore;

#[tokio::test]
async fn test_driver_without_truck_cannot_claim() {
    let app = TestApp::new();
    app.add_account("chofer1", Role::Driver).await;
    let route = app.add_route("Santiago", "Temuco").await;
    let cookie = app.login("chofer1").await;

    let response = app.post(&format!("/asignar_ruta/{}", route.id), &cookie).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "No tienes un camión asignado");

    let stored = app.store.find_route(route.id).await.unwrap().unwrap();
    assert!(stored.is_open());
}

#[tokio::test]
async fn test_claim_binds_driver_truck() {
    let app = TestApp::new();
    let driver = app.add_account("chofer1", Role::Driver).await;
    let truck = app.add_truck("ABCD11", Some(driver.id), None).await;
    let route = app.add_route("Santiago", "Temuco").await;
    let cookie = app.login("chofer1").await;

    let response = app.post(&format!("/asignar_ruta/{}", route.id), &cookie).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "en_progreso");
    assert_eq!(response.body["data"]["truck_id"], truck.id.to_string());
    assert!(!response.body["data"]["started_at"].is_null());

    let truck = app.store.find_truck(truck.id).await.unwrap().unwrap();
    assert_eq!(truck.status, TruckStatus::EnRuta);

    let history = app.store.tracking_for_route(route.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event, "reclamada");
    assert_eq!(history[0].location, "Santiago");

    // Una ruta ya tomada no se puede volver a reclamar
    let again = app.post(&format!("/asignar_ruta/{}", route.id), &cookie).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.message(), "Ruta no disponible");
}

#[tokio::test]
async fn test_concurrent_claims_have_single_winner() {
    let app = TestApp::new();
    let first = app.add_account("chofer1", Role::Driver).await;
    let second = app.add_account("chofer2", Role::Driver).await;
    app.add_truck("ABCD11", Some(first.id), None).await;
    app.add_truck("EFGH22", Some(second.id), None).await;
    let route = app.add_route("Temuco", "Valdivia").await;

    let first_cookie = app.login("chofer1").await;
    let second_cookie = app.login("chofer2").await;
    let uri = format!("/asignar_ruta/{}", route.id);

    let (a, b) = tokio::join!(app.post(&uri, &first_cookie), app.post(&uri, &second_cookie));

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let stored = app.store.find_route(route.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RouteStatus::InProgress);
    assert_eq!(app.store.tracking_for_route(route.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_bound_driver_can_complete() {
    let app = TestApp::new();
    let owner = app.add_account("chofer1", Role::Driver).await;
    let other = app.add_account("chofer2", Role::Driver).await;
    let truck = app.add_truck("ABCD11", Some(owner.id), None).await;
    app.add_truck("EFGH22", Some(other.id), None).await;
    let route = app.add_route("Santiago", "Valdivia").await;

    let owner_cookie = app.login("chofer1").await;
    let other_cookie = app.login("chofer2").await;
    app.post(&format!("/asignar_ruta/{}", route.id), &owner_cookie).await;

    let uri = format!("/update_route_status/{}/completada", route.id);
    let denied = app.post(&uri, &other_cookie).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.message(), "No autorizado");

    let done = app.post(&uri, &owner_cookie).await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["data"]["status"], "completada");
    assert_eq!(done.body["data"]["truck_id"], truck.id.to_string());

    let truck = app.store.find_truck(truck.id).await.unwrap().unwrap();
    assert_eq!(truck.status, TruckStatus::Disponible);

    // Completada es terminal
    let again = app.post(&uri, &owner_cookie).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    let resume = app
        .post(&format!("/update_route_status/{}/en_progreso", route.id), &owner_cookie)
        .await;
    assert_eq!(resume.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsupported_status_strings_are_rejected() {
    let app = TestApp::new();
    let driver = app.add_account("chofer1", Role::Driver).await;
    app.add_truck("ABCD11", Some(driver.id), None).await;
    let route = app.add_route("Santiago", "Temuco").await;
    let cookie = app.login("chofer1").await;
    app.post(&format!("/asignar_ruta/{}", route.id), &cookie).await;

    for status in ["pendiente", "cancelada"] {
        let response = app
            .post(&format!("/update_route_status/{}/{}", route.id, status), &cookie)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "estado {}", status);
        assert_eq!(response.message(), "Estado no soportado");
    }

    // Alias heredado
    let response = app
        .post(&format!("/update_route_status/{}/en%20curso", route.id), &cookie)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "en_progreso");
}

#[tokio::test]
async fn test_dispatcher_assigns_only_own_fleet() {
    let app = TestApp::new();
    let dispatcher = app.add_account("despachador", Role::Dispatcher).await;
    let rival = app.add_account("despachador2", Role::Dispatcher).await;
    let own = app.add_truck("ABCD11", None, Some(dispatcher.id)).await;
    let foreign = app.add_truck("EFGH22", None, Some(rival.id)).await;
    let route = app.add_route("Santiago", "Temuco").await;
    let cookie = app.login("despachador").await;

    let form = app.get(&format!("/asignar_chofer/{}", route.id), &cookie).await;
    assert_eq!(form.status, StatusCode::OK);
    assert_eq!(form.body["candidate_trucks"].as_array().unwrap().len(), 1);
    assert_eq!(form.body["candidate_trucks"][0]["id"], own.id.to_string());

    let denied = app
        .post(&format!("/asignar_chofer_confirm/{}/{}", route.id, foreign.id), &cookie)
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert!(app.store.find_route(route.id).await.unwrap().unwrap().is_open());

    let assigned = app
        .post(&format!("/asignar_chofer_confirm/{}/{}", route.id, own.id), &cookie)
        .await;
    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["data"]["status"], "en_progreso");

    let history = app.store.tracking_for_route(route.id).await.unwrap();
    assert_eq!(history[0].event, "asignada");

    // La ruta ya no es asignable
    let form = app.get(&format!("/asignar_chofer/{}", route.id), &cookie).await;
    assert_eq!(form.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_route_is_not_found() {
    let app = TestApp::new();
    let driver = app.add_account("chofer1", Role::Driver).await;
    app.add_truck("ABCD11", Some(driver.id), None).await;
    let cookie = app.login("chofer1").await;

    let response = app
        .post(&format!("/asignar_ruta/{}", uuid::Uuid::new_v4()), &cookie)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_route_lifecycle() {
    let app = TestApp::new();
    app.add_account("admin", Role::Admin).await;
    let dispatcher = app.add_account("despachador", Role::Dispatcher).await;
    let driver = app.add_account("chofer1", Role::Driver).await;
    app.add_truck("ABCD11", Some(driver.id), Some(dispatcher.id)).await;
    let route = app.add_route("Santiago", "Temuco").await;

    let cookie = app.login("chofer1").await;

    let dashboard = app.get("/dashboard_chofer", &cookie).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["truck"]["plate"], "ABCD11");
    assert_eq!(dashboard.body["available_routes"].as_array().unwrap().len(), 1);

    let claimed = app.post(&format!("/asignar_ruta/{}", route.id), &cookie).await;
    assert_eq!(claimed.body["data"]["status"], "en_progreso");

    let completed = app
        .post(&format!("/update_route_status/{}/completada", route.id), &cookie)
        .await;
    assert_eq!(completed.body["data"]["status"], "completada");

    let dashboard = app.get("/dashboard_chofer", &cookie).await;
    assert!(dashboard.body["available_routes"].as_array().unwrap().is_empty());
    assert_eq!(dashboard.body["assigned_routes"][0]["status"], "completada");

    let admin_cookie = app.login("admin").await;
    let history = app
        .get(&format!("/admin/routes/{}/tracking", route.id), &admin_cookie)
        .await;
    let events: Vec<&str> = history.body["tracking"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["event"].as_str().unwrap())
        .collect();
    assert_eq!(events, vec!["reclamada", "completada"]);
    assert_eq!(history.body["tracking"][1]["location"], "Temuco");
}
