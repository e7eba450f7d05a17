// ============================================================================
// SESSION VIEWMODEL - LÓGICA DE SESIÓN
// ============================================================================
// Login, registro, restauración al arrancar, logout y perfil. Los tokens se
// persisten aquí; el SessionStore solo guarda usuario, fase, loading y error.
// ============================================================================

use std::rc::Rc;

use crate::models::{LoginRequest, ProfilePatch, RegisterRequest, TokenResponse, User};
use crate::services::{ApiError, HttpGateway, UnauthorizedHandler};
use crate::state::AppState;
use crate::utils::storage::TokenStore;

/// Logout forzado ante un 401: tokens fuera, todo el estado reseteado y
/// navegación a la raíz anónima. Se ejecuta antes de devolver el error.
pub fn forced_logout_handler(state: AppState, tokens: TokenStore) -> UnauthorizedHandler {
    Rc::new(move || {
        log::warn!("🔒 [AUTH] 401 recibido, cerrando sesión");
        tokens.clear();
        state.reset_all();
    })
}

/// ViewModel de sesión
#[derive(Clone)]
pub struct SessionViewModel {
    gateway: HttpGateway,
    state: AppState,
}

impl SessionViewModel {
    pub fn new(gateway: HttpGateway, state: AppState) -> Self {
        Self { gateway, state }
    }

    fn tokens(&self) -> &TokenStore {
        self.gateway.tokens()
    }

    /// Login: guarda el par de tokens y deja la sesión autenticada
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let ticket = self.state.session.update(|s| s.begin_login());
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.authenticate(&credentials).await;
        self.state.session.update(|s| s.settle_login(ticket, result.clone()));
        result
    }

    async fn authenticate(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        let response: TokenResponse = self.gateway.auth().login(credentials).await?;
        let Some(access) = response.access.as_deref() else {
            return Err(ApiError::Parse("token response without access token".to_string()));
        };
        match response.refresh.as_deref() {
            Some(refresh) => self.tokens().store_pair(access, refresh)?,
            None => self.tokens().store_access(access)?,
        }

        if let Some(user) = response.user {
            return Ok(user);
        }

        // El endpoint de tokens no trae el usuario: se pide con el token nuevo
        log::info!("👤 [AUTH] Respuesta sin usuario, consultando /user/");
        match self.gateway.auth().current_user().await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.tokens().clear();
                Err(e)
            }
        }
    }

    /// Registro de empresa + dueño. Persiste los tokens si vienen en la respuesta.
    pub async fn register(&self, data: &RegisterRequest) -> Result<User, ApiError> {
        let ticket = self.state.session.update(|s| s.begin_register());
        let result = self.register_inner(data).await;
        self.state.session.update(|s| s.settle_register(ticket, result.clone()));
        result
    }

    async fn register_inner(&self, data: &RegisterRequest) -> Result<User, ApiError> {
        let response = self.gateway.auth().register(data).await?;
        match (response.access.as_deref(), response.refresh.as_deref(), response.token.as_deref()) {
            (Some(access), Some(refresh), _) => self.tokens().store_pair(access, refresh)?,
            (Some(access), None, _) | (None, _, Some(access)) => self.tokens().store_access(access)?,
            (None, _, None) => log::info!("📝 [AUTH] Registro sin tokens en la respuesta"),
        }
        if let Some(message) = response.message.as_deref() {
            log::info!("📝 [AUTH] {}", message);
        }
        Ok(response.user)
    }

    /// Usuario actual con el token guardado. Si falla, los tokens se borran
    /// (solo si la respuesta no llegó obsoleta: otro login pudo guardar tokens nuevos).
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        let ticket = self.state.session.update(|s| s.begin_current_user());
        let result = self.gateway.auth().current_user().await;
        let landed = self.state.session.update(|s| s.settle_current_user(ticket, result.clone()));
        if landed && result.is_err() {
            self.tokens().clear();
        }
        result
    }

    /// Arranque: solo consulta el usuario si hay token y aún no hay usuario
    pub async fn restore_session(&self) -> Result<Option<User>, ApiError> {
        let has_user = self.state.session.read(|s| s.user().is_some());
        if has_user || !self.tokens().has_access_token() {
            return Ok(None);
        }
        log::info!("🔄 [AUTH] Restaurando sesión desde el token guardado");
        self.get_current_user().await.map(Some)
    }

    /// Logout: blacklist best-effort del refresh token, y siempre limpia
    /// tokens y estado. Nunca falla.
    pub async fn logout(&self) {
        if let Some(refresh) = self.tokens().refresh_token() {
            if let Err(e) = self.gateway.auth().logout(&refresh).await {
                log::warn!("⚠️ [AUTH] Blacklist del refresh token falló: {}", e);
            }
        }
        self.tokens().clear();
        self.state.reset_all();
        log::info!("👋 [AUTH] Logout completado");
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<ProfilePatch, ApiError> {
        let ticket = self.state.session.update(|s| s.begin_profile_update());
        let result = self.gateway.auth().update_profile(patch).await;
        self.state.session.update(|s| s.settle_profile_update(ticket, result.clone()));
        result
    }

    /// Renueva el access token. Solo se llama explícitamente.
    pub async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let Some(refresh) = self.tokens().refresh_token() else {
            return Err(ApiError::Unauthorized { body: None });
        };
        let response = self.gateway.auth().refresh(&refresh).await?;
        match response.refresh.as_deref() {
            Some(rotated) => self.tokens().store_pair(&response.access, rotated)?,
            None => self.tokens().store_access(&response.access)?,
        }
        log::info!("🔑 [AUTH] Access token renovado");
        Ok(())
    }

    pub fn clear_error(&self) {
        self.state.session.update(|s| s.clear_error());
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::models::Role;
    use crate::routing::Screen;
    use crate::services::http::{HttpResponse, Method};
    use crate::viewmodels::test_support::{fixture, ADMIN_USER};

    fn login_body(with_user: bool) -> String {
        let mut body = json!({ "access": "T1", "refresh": "T2" });
        if with_user {
            body["user"] = serde_json::from_str(ADMIN_USER).unwrap();
        }
        body.to_string()
    }

    #[test]
    fn test_login_stores_tokens_and_routes_admin_home() {
        let f = fixture();
        f.transport.expect(Method::Post, "/accounts/api/token/", 200, &login_body(true));
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let user = block_on(vm.login("admin@acme.test", "secret")).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(f.tokens.access_token().as_deref(), Some("T1"));
        assert_eq!(f.tokens.refresh_token().as_deref(), Some("T2"));

        let session = f.state.session.read(|s| s.snapshot());
        assert!(session.is_authenticated);
        assert!(!session.loading);
        assert_eq!(session.error, None);
        assert_eq!(f.state.current_screen(), Screen::AdminDashboard);

        let body: serde_json::Value =
            serde_json::from_str(f.transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "admin@acme.test", "password": "secret" }));
    }

    #[test]
    fn test_login_without_user_fetches_current_user() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/accounts/api/token/", 200, &login_body(false))
            .expect(Method::Get, "/accounts/api/user/", 200, ADMIN_USER);
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(vm.login("admin@acme.test", "secret")).unwrap();
        assert_eq!(f.transport.requests()[1].header("Authorization"), Some("Bearer T1"));
        assert!(f.state.session.read(|s| s.is_authenticated()));
    }

    #[test]
    fn test_failed_login_persists_nothing() {
        let f = fixture();
        f.transport.expect(
            Method::Post,
            "/accounts/api/token/",
            401,
            r#"{"detail": "No active account found with the given credentials"}"#,
        );
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        assert!(block_on(vm.login("x@acme.test", "bad")).is_err());
        assert_eq!(f.tokens.access_token(), None);
        let session = f.state.session.read(|s| s.snapshot());
        assert!(!session.is_authenticated);
        assert_eq!(session.error.as_deref(), Some("No active account found with the given credentials"));

        assert!(!session.loading);
        assert_eq!(f.state.current_screen(), Screen::Auth);

        vm.clear_error();
        assert_eq!(f.state.session.read(|s| s.error().map(str::to_string)), None);
    }

    #[test]
    fn test_rejected_token_on_user_lookup_reports_login_error() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/accounts/api/token/", 200, &login_body(false))
            .expect(Method::Get, "/accounts/api/user/", 401, r#"{"detail": "User is inactive"}"#);
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        assert!(block_on(vm.login("admin@acme.test", "secret")).unwrap_err().is_unauthorized());
        assert_eq!(f.tokens.access_token(), None);
        let session = f.state.session.read(|s| s.snapshot());
        assert!(!session.is_authenticated);
        assert_eq!(session.error.as_deref(), Some("User is inactive"));
    }

    #[test]
    fn test_register_rejected_with_401_keeps_error() {
        let f = fixture();
        f.transport.expect(Method::Post, "/accounts/api/register/", 401, "{}");
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let data = RegisterRequest { email: "owner@acme.test".into(), ..Default::default() };
        assert!(block_on(vm.register(&data)).is_err());
        assert_eq!(f.state.session.read(|s| s.error().map(str::to_string)).as_deref(), Some("Registration failed"));
    }

    #[test]
    fn test_stale_failed_restore_keeps_tokens_from_newer_login() {
        let f = fixture();
        f.tokens.store_pair("OLD", "R0").unwrap();
        let restore_reply = f.transport.expect_deferred(Method::Get, "/accounts/api/user/");
        f.transport.expect(Method::Post, "/accounts/api/token/", 200, &login_body(true));
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let mut restore = Box::pin(vm.restore_session());
        block_on(async {
            assert!(futures::poll!(restore.as_mut()).is_pending());
        });
        block_on(vm.login("admin@acme.test", "secret")).unwrap();

        restore_reply.send(Err(ApiError::Network("offline".into()))).unwrap();
        assert!(block_on(restore).is_err());

        assert_eq!(f.tokens.access_token().as_deref(), Some("T1"));
        let session = f.state.session.read(|s| s.snapshot());
        assert!(session.is_authenticated);
        assert_eq!(session.error, None);
    }

    #[test]
    fn test_register_with_legacy_token() {
        let f = fixture();
        let body = json!({
            "user": { "id": 5, "email": "owner@acme.test", "role": "PARENT", "company": "c-9" },
            "token": "LEGACY",
            "message": "Registration successful"
        });
        f.transport.expect(Method::Post, "/accounts/api/register/", 201, &body.to_string());
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let data = RegisterRequest {
            email: "owner@acme.test".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            company_name: "Acme".into(),
            registration_number: "RC-1".into(),
            ..Default::default()
        };
        let user = block_on(vm.register(&data)).unwrap();
        assert_eq!(user.role, Role::Parent);
        assert_eq!(f.tokens.access_token().as_deref(), Some("LEGACY"));
        assert_eq!(f.state.current_screen(), Screen::CompanyDashboard);
    }

    #[test]
    fn test_logout_clears_tokens_even_when_server_fails() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/accounts/api/token/", 200, &login_body(true))
            .expect_error(Method::Post, "/accounts/api/token/blacklist/", ApiError::Network("down".into()));
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());
        block_on(vm.login("admin@acme.test", "secret")).unwrap();

        block_on(vm.logout());
        assert_eq!(f.tokens.access_token(), None);
        assert_eq!(f.tokens.refresh_token(), None);
        assert!(!f.state.session.read(|s| s.is_authenticated()));
        assert_eq!(f.state.current_screen(), Screen::Auth);

        let blacklist = &f.transport.requests()[1];
        assert_eq!(blacklist.body.as_deref(), Some(r#"{"refresh":"T2"}"#));
    }

    #[test]
    fn test_restore_session_only_with_token_and_no_user() {
        let f = fixture();
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        // Sin token no hay llamada
        assert_eq!(block_on(vm.restore_session()), Ok(None));
        assert!(f.transport.requests().is_empty());

        f.tokens.store_pair("T1", "T2").unwrap();
        f.transport.expect(Method::Get, "/accounts/api/user/", 200, ADMIN_USER);
        let restored = block_on(vm.restore_session()).unwrap();
        assert_eq!(restored.map(|u| u.role), Some(Role::Admin));

        // Ya hay usuario: no se vuelve a pedir
        assert_eq!(block_on(vm.restore_session()), Ok(None));
        assert_eq!(f.transport.requests().len(), 1);
    }

    #[test]
    fn test_expired_token_forces_logout_on_restore() {
        let f = fixture();
        f.tokens.store_pair("EXPIRED", "T2").unwrap();
        f.transport.expect(
            Method::Get,
            "/accounts/api/user/",
            401,
            r#"{"detail": "Given token not valid for any token type"}"#,
        );
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let err = block_on(vm.restore_session()).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(f.tokens.access_token(), None);
        let session = f.state.session.read(|s| s.snapshot());
        assert!(!session.is_authenticated);
        assert!(!session.loading);
        assert_eq!(f.state.current_screen(), Screen::Auth);
    }

    #[test]
    fn test_unauthorized_mid_session_resets_everything() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/accounts/api/token/", 200, &login_body(true))
            .expect(Method::Get, "/companies/api/departments/", 200, r#"[{"id": 1, "name": "Sales"}]"#)
            .expect(Method::Get, "/companies/api/admin-users/", 401, "{}");
        let session = SessionViewModel::new(f.gateway.clone(), f.state.clone());
        let company = crate::viewmodels::CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(session.login("admin@acme.test", "secret")).unwrap();
        block_on(company.fetch_departments()).unwrap();
        assert_eq!(f.state.company.read(|c| c.departments().len()), 1);

        assert!(block_on(company.fetch_admin_users()).unwrap_err().is_unauthorized());
        assert_eq!(f.tokens.access_token(), None);
        assert!(!f.state.session.read(|s| s.is_authenticated()));
        assert!(f.state.company.read(|c| c.departments().is_empty()));
        assert!(!f.state.company.read(|c| c.loading().admin_users));
    }

    #[test]
    fn test_update_profile_merges_response() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/accounts/api/token/", 200, &login_body(true))
            .expect(Method::Patch, "/accounts/api/user/", 200, r#"{"phone": "+33 6 00"}"#);
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());
        block_on(vm.login("admin@acme.test", "secret")).unwrap();

        let patch = json!({ "phone": "+33 6 00" });
        block_on(vm.update_profile(patch.as_object().unwrap())).unwrap();
        let phone = f.state.session.read(|s| s.user().and_then(|u| u.phone.clone()));
        assert_eq!(phone.as_deref(), Some("+33 6 00"));
    }

    #[test]
    fn test_refresh_rotates_tokens() {
        let f = fixture();
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());
        assert!(block_on(vm.refresh_access_token()).unwrap_err().is_unauthorized());

        f.tokens.store_pair("OLD", "R1").unwrap();
        f.transport.expect(Method::Post, "/accounts/api/token/refresh/", 200, r#"{"access": "NEW", "refresh": "R2"}"#);
        block_on(vm.refresh_access_token()).unwrap();
        assert_eq!(f.tokens.access_token().as_deref(), Some("NEW"));
        assert_eq!(f.tokens.refresh_token().as_deref(), Some("R2"));
    }

    #[test]
    fn test_deferred_login_keeps_loading_until_reply() {
        let f = fixture();
        let reply = f.transport.expect_deferred(Method::Post, "/accounts/api/token/");
        let vm = SessionViewModel::new(f.gateway.clone(), f.state.clone());

        let mut login = Box::pin(vm.login("admin@acme.test", "secret"));
        block_on(async {
            assert!(futures::poll!(login.as_mut()).is_pending());
        });
        assert!(f.state.session.read(|s| s.is_loading()));

        reply.send(Ok(HttpResponse::new(200, login_body(true)))).unwrap();
        block_on(login).unwrap();
        assert!(!f.state.session.read(|s| s.is_loading()));
    }
}
