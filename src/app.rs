// ============================================================================
// APP - Raíz de composición de la consola
// ============================================================================
// Construye storage → tokens → estado → gateway (con el logout forzado
// cableado) → viewmodels. La vista solo habla con esto.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::User;
use crate::routing::{navigation_for, NavItem, Screen};
use crate::services::http::{default_transport, Transport};
use crate::services::{ApiError, HttpGateway};
use crate::state::AppState;
use crate::utils::storage::{default_storage, KeyValueStorage, TokenStore};
use crate::viewmodels::{
    forced_logout_handler, CompanyViewModel, EmployeeViewModel, SessionViewModel, TaskScope,
};

/// Aplicación principal
pub struct AdminConsole {
    state: AppState,
    tokens: TokenStore,
    scope: TaskScope,
    pub session: SessionViewModel,
    pub company: CompanyViewModel,
    pub employees: EmployeeViewModel,
}

impl AdminConsole {
    /// Con el transporte y el storage de la plataforma
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(config, default_transport(), default_storage())
    }

    pub fn with_parts(
        config: &AppConfig,
        transport: Rc<dyn Transport>,
        storage: Rc<dyn KeyValueStorage>,
    ) -> Self {
        log::info!(
            "🚀 [APP] Consola RR.HH. ({}) contra {}",
            config.environment,
            config.base_url()
        );
        let state = AppState::new();
        let tokens = TokenStore::new(storage);
        let gateway = HttpGateway::new(
            config,
            transport,
            tokens.clone(),
            forced_logout_handler(state.clone(), tokens.clone()),
        );

        Self {
            session: SessionViewModel::new(gateway.clone(), state.clone()),
            company: CompanyViewModel::new(gateway.clone(), state.clone()),
            employees: EmployeeViewModel::new(gateway, state.clone()),
            state,
            tokens,
            scope: TaskScope::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Scope de las operaciones lanzadas desde la raíz
    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    pub fn navigate(&self, path: &str) -> Screen {
        self.state.navigate(path)
    }

    pub fn current_screen(&self) -> Screen {
        self.state.current_screen()
    }

    /// Menú del usuario actual; vacío sin sesión
    pub fn navigation(&self) -> Vec<NavItem> {
        self.state
            .session
            .read(|s| s.role())
            .map(navigation_for)
            .unwrap_or_default()
    }

    /// Arranque: restaura la sesión si hay token guardado
    pub async fn start(&self) -> Result<Option<User>, ApiError> {
        self.scope.run(self.session.restore_session()).await
    }
}
