// ============================================================================
// SESSION STATE - Usuario autenticado + fase de la sesión
// ============================================================================
// Reducers puros: los viewmodels hacen las llamadas HTTP y liquidan aquí el
// resultado con el `Ticket` que recibieron en el begin_*.
// ============================================================================

use crate::models::{EntityId, ProfilePatch, Role, User};
use crate::services::error::ApiError;
use crate::state::operation::{Outcome, Slot, Ticket};
use crate::utils::merge_patch;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const CURRENT_USER_FAILED: &str = "Failed to get user data";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";

/// Fase de la sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    /// login/register en curso
    Authenticating,
    Authenticated,
    /// Recuperando el usuario actual con un token guardado
    Refreshing,
}

/// Vista plana de la sesión para la UI
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    user: Option<User>,
    phase: AuthPhase,
    slot: Slot,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// Autenticado implica que hay usuario
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn company_id(&self) -> Option<&EntityId> {
        self.user.as_ref().and_then(|u| u.company.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.slot.error()
    }

    pub fn clear_error(&mut self) {
        self.slot.clear_error();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated(),
            loading: self.is_loading(),
            error: self.error().map(str::to_string),
        }
    }

    // ========================================================================
    // LOGIN / REGISTER
    // ========================================================================

    pub fn begin_login(&mut self) -> Ticket {
        self.phase = AuthPhase::Authenticating;
        self.slot.begin()
    }

    pub fn settle_login(&mut self, ticket: Ticket, result: Result<User, ApiError>) {
        self.settle_authentication(ticket, result, LOGIN_FAILED);
    }

    pub fn begin_register(&mut self) -> Ticket {
        self.phase = AuthPhase::Authenticating;
        self.slot.begin()
    }

    pub fn settle_register(&mut self, ticket: Ticket, result: Result<User, ApiError>) {
        self.settle_authentication(ticket, result, REGISTRATION_FAILED);
    }

    fn settle_authentication(&mut self, ticket: Ticket, result: Result<User, ApiError>, fallback: &str) {
        // Un 401 del propio login/registro ya reseteó el store (logout forzado):
        // el ticket es de antes del reset pero el error tiene que verse igual
        let unauthorized = match &result {
            Err(e) if e.is_unauthorized() => Some(e.clone()),
            _ => None,
        };
        match (self.slot.settle(ticket, result, fallback), unauthorized) {
            (Outcome::Discarded, Some(error)) => {
                log::warn!("🔒 [SESSION] Credenciales rechazadas: {}", error.user_message(fallback));
                self.slot.report(&error, fallback);
            }
            (outcome, _) => self.apply_authentication(outcome),
        }
    }

    // ========================================================================
    // USUARIO ACTUAL
    // ========================================================================

    pub fn begin_current_user(&mut self) -> Ticket {
        self.phase = AuthPhase::Refreshing;
        self.slot.begin()
    }

    /// Devuelve false si la respuesta llegó obsoleta y no se aplicó
    pub fn settle_current_user(&mut self, ticket: Ticket, result: Result<User, ApiError>) -> bool {
        let outcome = self.slot.settle_latest(ticket, result, CURRENT_USER_FAILED);
        let landed = !matches!(outcome, Outcome::Discarded);
        self.apply_authentication(outcome);
        landed
    }

    fn apply_authentication(&mut self, outcome: Outcome<User>) {
        match outcome {
            Outcome::Applied(user) => {
                log::info!("✅ [SESSION] Sesión de {} ({})", user.email, user.role.as_str());
                self.user = Some(user);
                self.phase = AuthPhase::Authenticated;
            }
            Outcome::Rejected => {
                self.user = None;
                self.phase = AuthPhase::Anonymous;
            }
            Outcome::Discarded => {}
        }
    }

    // ========================================================================
    // PERFIL
    // ========================================================================

    pub fn begin_profile_update(&mut self) -> Ticket {
        self.slot.begin()
    }

    /// Mezcla la respuesta en el usuario actual; sin usuario no hay nada que tocar
    pub fn settle_profile_update(&mut self, ticket: Ticket, result: Result<ProfilePatch, ApiError>) {
        let Some(patch) = self.slot.settle(ticket, result, PROFILE_UPDATE_FAILED).applied() else {
            return;
        };
        let Some(user) = self.user.as_ref() else {
            log::debug!("🗑️ [SESSION] Perfil actualizado sin usuario en sesión, ignorado");
            return;
        };
        // `id` y `role` no se dejan pisar por el patch
        let mut patch = patch;
        patch.remove("id");
        patch.remove("role");
        match merge_patch(user, &patch) {
            Ok(merged) => self.user = Some(merged),
            Err(e) => log::error!("❌ [SESSION] No se pudo mezclar el perfil: {}", e),
        }
    }

    /// Logout / 401: vuelta al estado inicial. Las respuestas en vuelo de
    /// antes del reset se descartan.
    pub fn reset(&mut self) {
        log::info!("👋 [SESSION] Sesión reseteada");
        *self = Self::default();
    }
}
