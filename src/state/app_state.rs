// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Los tres stores son hermanos: ninguno muta a otro. El router escucha a la
// sesión y se re-evalúa en cada cambio.
// ============================================================================

use crate::routing::{Router, Screen};
use crate::state::company_state::CompanyStore;
use crate::state::employee_state::EmployeeStore;
use crate::state::operation::SubmissionGuard;
use crate::state::reactivity::ReactiveState;
use crate::state::session_state::SessionStore;

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: ReactiveState<SessionStore>,
    pub company: ReactiveState<CompanyStore>,
    pub employees: ReactiveState<EmployeeStore>,
    pub router: ReactiveState<Router>,
    pub submissions: SubmissionGuard,
}

impl AppState {
    pub fn new() -> Self {
        let state = Self {
            session: ReactiveState::default(),
            company: ReactiveState::default(),
            employees: ReactiveState::default(),
            router: ReactiveState::default(),
            submissions: SubmissionGuard::new(),
        };

        let session = state.session.clone();
        let router = state.router.clone();
        state.session.subscribe(move || {
            let role = session.read(|s| s.role());
            let changed = router.read(|r| crate::routing::resolve(role, r.requested()) != r.current());
            if changed {
                router.update(|r| r.reevaluate(role));
            }
        });

        state
    }

    /// Navegar a una ruta con la sesión actual
    pub fn navigate(&self, path: &str) -> Screen {
        let role = self.session.read(|s| s.role());
        self.router.update(|r| r.navigate(role, path))
    }

    pub fn current_screen(&self) -> Screen {
        self.router.read(|r| r.current())
    }

    /// Logout / 401: sesión, datos de empresa y empleados al estado inicial
    /// y navegación a la raíz anónima.
    pub fn reset_all(&self) {
        log::info!("🧹 [STATE] Reseteando todo el estado");
        self.company.update(|c| c.reset());
        self.employees.update(|e| e.reset());
        self.router.update(|r| r.reset());
        self.session.update(|s| s.reset());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use serde_json::json;

    fn admin() -> User {
        serde_json::from_value(json!({
            "id": 2,
            "email": "admin@acme.test",
            "role": "ADMIN",
            "company": "c-1"
        }))
        .unwrap()
    }

    #[test]
    fn test_router_reacts_to_session_changes() {
        let state = AppState::new();
        assert_eq!(state.navigate("/departments"), Screen::Auth);

        state.session.update(|s| {
            let ticket = s.begin_login();
            s.settle_login(ticket, Ok(admin()));
        });
        assert_eq!(state.current_screen(), Screen::Departments);
        assert_eq!(state.session.read(|s| s.role()), Some(Role::Admin));

        state.reset_all();
        assert_eq!(state.current_screen(), Screen::Auth);
        assert!(!state.session.read(|s| s.is_authenticated()));
    }

    #[test]
    fn test_login_from_root_lands_on_role_home() {
        let state = AppState::new();
        state.navigate("/");
        state.session.update(|s| {
            let ticket = s.begin_login();
            s.settle_login(ticket, Ok(admin()));
        });
        assert_eq!(state.current_screen(), Screen::AdminDashboard);
    }
}
