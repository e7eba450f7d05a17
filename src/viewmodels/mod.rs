// ============================================================================
// VIEWMODELS - Lógica de negocio
// ============================================================================
// Cada operación: begin en el store → llamada al gateway → settle en el store.
// El Result se devuelve además a quien llama (p. ej. para navegar tras un alta).
// ============================================================================

pub mod company_viewmodel;
pub mod employee_viewmodel;
pub mod session_viewmodel;
pub mod task_scope;

pub use company_viewmodel::CompanyViewModel;
pub use employee_viewmodel::EmployeeViewModel;
pub use session_viewmodel::{forced_logout_handler, SessionViewModel};
pub use task_scope::TaskScope;

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use crate::config::AppConfig;
    use crate::services::http::mock::MockTransport;
    use crate::services::HttpGateway;
    use crate::state::AppState;
    use crate::utils::storage::{MemoryStorage, TokenStore};

    use super::forced_logout_handler;

    /// Gateway con transporte guionizado y el logout forzado real cableado
    pub struct Fixture {
        pub state: AppState,
        pub gateway: HttpGateway,
        pub transport: Rc<MockTransport>,
        pub tokens: TokenStore,
    }

    pub fn fixture() -> Fixture {
        let state = AppState::new();
        let transport = Rc::new(MockTransport::new());
        let tokens = TokenStore::new(Rc::new(MemoryStorage::new()));
        let gateway = HttpGateway::new(
            &AppConfig::default(),
            transport.clone(),
            tokens.clone(),
            forced_logout_handler(state.clone(), tokens.clone()),
        );
        Fixture { state, gateway, transport, tokens }
    }

    pub const ADMIN_USER: &str = r#"{
        "id": 2,
        "first_name": "Admin",
        "last_name": "Acme",
        "email": "admin@acme.test",
        "role": "ADMIN",
        "company": "c-1"
    }"#;
}
