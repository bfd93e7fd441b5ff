use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::repositories::FleetStore;
use crate::services::auth_service::authenticate;
use crate::utils::errors::AppResult;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    store: Arc<dyn FleetStore>,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(store: Arc<dyn FleetStore>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let account = authenticate(self.store.as_ref(), request.username.trim(), &request.password).await?;
        let token = generate_token(&account, &self.jwt)?;

        Ok(LoginResponse::new(token, account.username, account.role))
    }
}
