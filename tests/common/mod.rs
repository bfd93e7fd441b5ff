#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use fleet_dispatch::config::environment::EnvironmentConfig;
use fleet_dispatch::models::{
    Account, NewAccount, Role, Route, RouteFields, RouteStatus, Truck, TruckFields, TruckStatus,
};
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore};
use fleet_dispatch::services::auth_service::hash_password;
use fleet_dispatch::{create_router, AppState};

pub const PASSWORD: &str = "1234";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryFleetStore>,
    pub config: EnvironmentConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let config = EnvironmentConfig {
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };
        let store = Arc::new(MemoryFleetStore::new());
        let app = create_router(AppState::new(store.clone(), config.clone()));
        Self { app, store, config }
    }

    pub async fn add_account(&self, username: &str, role: Role) -> Account {
        let password_hash = hash_password(PASSWORD.to_string(), 4).await.unwrap();
        self.store
            .insert_account(&Account::from_new(NewAccount {
                username: username.to_string(),
                role,
                password_hash,
            }))
            .await
            .unwrap()
    }

    pub async fn add_truck(&self, plate: &str, driver: Option<Uuid>, dispatcher: Option<Uuid>) -> Truck {
        self.store
            .insert_truck(&Truck::from_fields(TruckFields {
                plate: plate.to_string(),
                status: TruckStatus::Disponible,
                cargo: None,
                driver_id: driver,
                dispatcher_id: dispatcher,
            }))
            .await
            .unwrap()
    }

    pub async fn add_route(&self, origin: &str, destination: &str) -> Route {
        self.store
            .insert_route(&Route::from_fields(RouteFields {
                origin: origin.to_string(),
                destination: destination.to_string(),
                status: RouteStatus::Pending,
                truck_id: None,
            }))
            .await
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(cookie), None).await
    }

    pub async fn post_json(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(cookie), Some(body)).await
    }

    /// Login y cookie lista para reenviar
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login de {}", username);
        let token = response.body["token"].as_str().unwrap();
        format!("session={}", token)
    }
}
