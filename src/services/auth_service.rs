use crate::models::{
    LoginRequest, ProfilePatch, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, TokenResponse, User,
};
use crate::services::api_client::HttpGateway;
use crate::services::error::ApiError;

const LOGIN_PATH: &str = "/accounts/api/token/";
const REFRESH_PATH: &str = "/accounts/api/token/refresh/";
const BLACKLIST_PATH: &str = "/accounts/api/token/blacklist/";
const REGISTER_PATH: &str = "/accounts/api/register/";
const USER_PATH: &str = "/accounts/api/user/";

/// Llamadas `auth.*`
pub struct AuthApi<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
        log::info!("🔐 [AUTH] Login para {}", credentials.email);
        self.gateway.post(LOGIN_PATH, credentials).await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        log::info!("📝 [AUTH] Registro de {} ({})", data.email, data.company_name);
        self.gateway.post(REGISTER_PATH, data).await
    }

    /// Invalida el refresh token en el servidor
    pub async fn logout(&self, refresh: &str) -> Result<(), ApiError> {
        let body = RefreshRequest { refresh: refresh.to_string() };
        self.gateway.post_discard(BLACKLIST_PATH, &body).await
    }

    pub async fn refresh(&self, refresh: &str) -> Result<RefreshResponse, ApiError> {
        let body = RefreshRequest { refresh: refresh.to_string() };
        self.gateway.post(REFRESH_PATH, &body).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.gateway.get(USER_PATH).await
    }

    /// Devuelve los campos tal como los manda el servidor, para mezclarlos
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<ProfilePatch, ApiError> {
        self.gateway.patch(USER_PATH, patch).await
    }
}
