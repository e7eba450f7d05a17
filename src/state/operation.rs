// ============================================================================
// OPERATION - Ciclo de vida pending / fulfilled / rejected por slot
// ============================================================================
// Cada recurso (profile, departments, list, create...) tiene un `Slot` con su
// loading y su error independientes. `begin()` marca pending y entrega un
// `Ticket`; la operación se liquida consumiendo el ticket exactamente una vez.
// Si el future se descarta sin liquidar (cancelación), soltar el ticket
// libera igualmente el loading.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::services::error::ApiError;

#[derive(Debug, Default)]
struct SlotShared {
    in_flight: Cell<u32>,
}

/// Loading + error de un sub-recurso
#[derive(Debug, Clone, Default)]
pub struct Slot {
    shared: Rc<SlotShared>,
    error: Option<String>,
    issued: u64,
    applied: u64,
}

/// Resultado de liquidar una operación
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// fulfilled: el reducer debe aplicar el valor
    Applied(T),
    /// rejected: el error ya quedó en el slot
    Rejected,
    /// Respuesta obsoleta o de antes de un reset: no se toca nada
    Discarded,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

/// Derecho a liquidar una operación iniciada con [`Slot::begin`]
#[must_use = "una operación iniciada debe liquidarse con su ticket"]
#[derive(Debug)]
pub struct Ticket {
    shared: Rc<SlotShared>,
    seq: u64,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let in_flight = self.shared.in_flight.get();
        self.shared.in_flight.set(in_flight.saturating_sub(1));
    }
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// pending: loading = true, error = None
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.error = None;
        self.shared.in_flight.set(self.shared.in_flight.get() + 1);
        Ticket {
            shared: self.shared.clone(),
            seq: self.issued,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.shared.in_flight.get() > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Deja un error sin pasar por un ticket (la operación ya no pertenece a
    /// este slot, p. ej. tras el reset forzado por su propio 401)
    pub fn report(&mut self, error: &ApiError, fallback: &str) {
        self.error = Some(error.user_message(fallback));
    }

    /// El ticket pertenece a esta instancia del slot (no a una anterior a un reset)
    fn owns(&self, ticket: &Ticket) -> bool {
        Rc::ptr_eq(&self.shared, &ticket.shared)
    }

    /// Liquida una operación que reemplaza datos (fetch). Las respuestas más
    /// viejas que la última aplicada se descartan sin tocar el estado.
    pub fn settle_latest<T>(
        &mut self,
        ticket: Ticket,
        result: Result<T, ApiError>,
        fallback: &str,
    ) -> Outcome<T> {
        if !self.owns(&ticket) {
            log::debug!("🗑️ [STORE] Respuesta de un estado ya reseteado, descartada");
            return Outcome::Discarded;
        }
        if ticket.seq <= self.applied {
            log::debug!(
                "🗑️ [STORE] Respuesta obsoleta descartada (#{} <= #{})",
                ticket.seq,
                self.applied
            );
            return Outcome::Discarded;
        }
        self.applied = ticket.seq;
        drop(ticket);
        self.finish(result, fallback)
    }

    /// Liquida una mutación (create/update/delete): siempre se aplica, y deja
    /// obsoletos los fetch iniciados antes que ella
    pub fn settle<T>(&mut self, ticket: Ticket, result: Result<T, ApiError>, fallback: &str) -> Outcome<T> {
        if !self.owns(&ticket) {
            log::debug!("🗑️ [STORE] Respuesta de un estado ya reseteado, descartada");
            return Outcome::Discarded;
        }
        self.applied = self.applied.max(ticket.seq);
        drop(ticket);
        self.finish(result, fallback)
    }

    fn finish<T>(&mut self, result: Result<T, ApiError>, fallback: &str) -> Outcome<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Outcome::Applied(value)
            }
            Err(e) => {
                self.error = Some(e.user_message(fallback));
                Outcome::Rejected
            }
        }
    }
}

// ============================================================================
// ENVÍOS DUPLICADOS
// ============================================================================

/// Tipos de alta protegidos contra doble envío
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Department,
    AdminUser,
    Employee,
    Company,
}

/// Permite una sola alta en vuelo por tipo
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    active: Rc<RefCell<HashSet<SubmissionKind>>>,
}

/// Se libera al soltarse (al terminar la operación o al cancelarla)
#[derive(Debug)]
pub struct SubmissionPermit {
    kind: SubmissionKind,
    active: Rc<RefCell<HashSet<SubmissionKind>>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, kind: SubmissionKind) -> Result<SubmissionPermit, ApiError> {
        if !self.active.borrow_mut().insert(kind) {
            log::warn!("⚠️ [STORE] Alta {:?} ya en curso, envío duplicado ignorado", kind);
            return Err(ApiError::DuplicateSubmission);
        }
        Ok(SubmissionPermit {
            kind,
            active: self.active.clone(),
        })
    }

    pub fn is_active(&self, kind: SubmissionKind) -> bool {
        self.active.borrow().contains(&kind)
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.kind);
    }
}
