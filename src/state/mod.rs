// ============================================================================
// STATE MODULE - Stores con Rc<RefCell> + notificaciones
// ============================================================================

pub mod app_state;
pub mod collection;
pub mod company_state;
pub mod employee_state;
pub mod operation;
pub mod reactivity;
pub mod session_state;

pub use app_state::AppState;
pub use company_state::{CompanyErrors, CompanyLoading, CompanyStore};
pub use employee_state::{filter_employees, EmployeeErrors, EmployeeLoading, EmployeeSlot, EmployeeStore};
pub use operation::{Outcome, Slot, SubmissionGuard, SubmissionKind, SubmissionPermit, Ticket};
pub use reactivity::ReactiveState;
pub use session_state::{AuthPhase, SessionSnapshot, SessionStore};
