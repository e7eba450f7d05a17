// ============================================================================
// ROUTING - Pantallas, permisos por rol y redirecciones
// ============================================================================
// `evaluate` es puro: sesión + ruta pedida → renderizar o redirigir.
// `Router` guarda la ruta actual y se re-evalúa al navegar y cada vez que
// cambia la sesión.
// ============================================================================

use crate::models::Role;

const PARENT_ONLY: &[Role] = &[Role::Parent];
const PARENT_OR_ADMIN: &[Role] = &[Role::Parent, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const EMPLOYEE_ONLY: &[Role] = &[Role::Employee];

/// Máximo de redirecciones encadenadas al resolver una ruta
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Login / registro, raíz anónima
    Auth,
    CompanyDashboard,
    AdminUsers,
    AddAdminUser,
    CompanySettings,
    Employees,
    AddEmployee,
    Departments,
    AdminDashboard,
    EmployeeDashboard,
}

impl Screen {
    pub const ALL: [Screen; 10] = [
        Screen::Auth,
        Screen::CompanyDashboard,
        Screen::AdminUsers,
        Screen::AddAdminUser,
        Screen::CompanySettings,
        Screen::Employees,
        Screen::AddEmployee,
        Screen::Departments,
        Screen::AdminDashboard,
        Screen::EmployeeDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Screen::Auth => "/",
            Screen::CompanyDashboard => "/company-dashboard",
            Screen::AdminUsers => "/admin-users",
            Screen::AddAdminUser => "/admin-users/new",
            Screen::CompanySettings => "/company/settings",
            Screen::Employees => "/employees",
            Screen::AddEmployee => "/employees/new",
            Screen::Departments => "/departments",
            Screen::AdminDashboard => "/admin-dashboard",
            Screen::EmployeeDashboard => "/dashboard",
        }
    }

    /// Ignora query, fragmento y la barra final
    pub fn from_path(path: &str) -> Option<Screen> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Screen::ALL.into_iter().find(|screen| screen.path() == normalized)
    }

    /// Roles que pueden ver la pantalla. `Auth` es solo para anónimos.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Screen::Auth => &[],
            Screen::CompanyDashboard
            | Screen::AdminUsers
            | Screen::AddAdminUser
            | Screen::CompanySettings => PARENT_ONLY,
            Screen::Employees | Screen::AddEmployee | Screen::Departments => PARENT_OR_ADMIN,
            Screen::AdminDashboard => ADMIN_ONLY,
            Screen::EmployeeDashboard => EMPLOYEE_ONLY,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Screen::Auth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Screen),
    Redirect(Screen),
}

impl RouteDecision {
    pub fn screen(&self) -> Screen {
        match self {
            RouteDecision::Render(screen) | RouteDecision::Redirect(screen) => *screen,
        }
    }
}

/// Pantalla de inicio de cada rol
pub fn home_for(role: Role) -> Screen {
    match role {
        Role::Parent => Screen::CompanyDashboard,
        Role::Admin => Screen::AdminDashboard,
        Role::Employee => Screen::EmployeeDashboard,
    }
}

/// Decide qué hacer con una ruta. `role` es `None` para la sesión anónima
/// (autenticado implica que hay usuario, y por tanto rol).
pub fn evaluate(role: Option<Role>, requested: &str) -> RouteDecision {
    let Some(screen) = Screen::from_path(requested) else {
        // catch-all → raíz
        return RouteDecision::Redirect(Screen::Auth);
    };
    match (role, screen.is_protected()) {
        (None, false) => RouteDecision::Render(screen),
        (None, true) => RouteDecision::Redirect(Screen::Auth),
        (Some(role), false) => RouteDecision::Redirect(home_for(role)),
        (Some(role), true) if screen.allowed_roles().contains(&role) => RouteDecision::Render(screen),
        (Some(role), true) => RouteDecision::Redirect(home_for(role)),
    }
}

/// Sigue las redirecciones hasta una pantalla que se renderiza
pub fn resolve(role: Option<Role>, requested: &str) -> Screen {
    let mut decision = evaluate(role, requested);
    for _ in 0..MAX_REDIRECTS {
        match decision {
            RouteDecision::Render(screen) => return screen,
            RouteDecision::Redirect(target) => decision = evaluate(role, target.path()),
        }
    }
    log::warn!("⚠️ [ROUTER] Demasiadas redirecciones para {}", requested);
    decision.screen()
}

/// Entrada de navegación lateral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub screen: Screen,
}

const fn nav(label: &'static str, screen: Screen) -> NavItem {
    NavItem { label, screen }
}

/// Menú por rol; toda entrada apunta a una pantalla que ese rol puede ver
pub fn navigation_for(role: Role) -> Vec<NavItem> {
    match role {
        Role::Parent => vec![
            nav("Company Dashboard", Screen::CompanyDashboard),
            nav("Admin Users", Screen::AdminUsers),
            nav("Employees", Screen::Employees),
            nav("Departments", Screen::Departments),
            nav("Settings", Screen::CompanySettings),
        ],
        Role::Admin => vec![
            nav("Dashboard", Screen::AdminDashboard),
            nav("Employees", Screen::Employees),
            nav("Departments", Screen::Departments),
        ],
        Role::Employee => vec![nav("Dashboard", Screen::EmployeeDashboard)],
    }
}

// ============================================================================
// ROUTER STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    requested: String,
    current: Screen,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            requested: Screen::Auth.path().to_string(),
            current: Screen::Auth,
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Última ruta pedida (antes de redirecciones)
    pub fn requested(&self) -> &str {
        &self.requested
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn current_path(&self) -> &'static str {
        self.current.path()
    }

    pub fn navigate(&mut self, role: Option<Role>, path: &str) -> Screen {
        self.requested = path.to_string();
        self.reevaluate(role)
    }

    /// Re-evalúa la ruta pedida con la sesión actual. Devuelve la pantalla
    /// resultante.
    pub fn reevaluate(&mut self, role: Option<Role>) -> Screen {
        let screen = resolve(role, &self.requested);
        if screen != self.current {
            log::info!("🧭 [ROUTER] {} → {}", self.requested, screen.path());
        }
        self.current = screen;
        screen
    }

    /// Vuelta a la raíz anónima (logout / 401)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
