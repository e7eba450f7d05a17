// ============================================================================
// EMPLOYEE STATE - Listado, detalle, filtros y paginación de empleados
// ============================================================================

use serde_json::Value;

use crate::models::{
    Employee, EmployeeFilters, EmployeeListResponse, EmployeePatch, EntityId, FiltersPatch,
    Pagination, PaginationPatch,
};
use crate::services::error::ApiError;
use crate::state::collection::{remove_by_id, upsert};
use crate::state::operation::{Outcome, Slot, Ticket};
use crate::utils::merge_patch;

const FETCH_EMPLOYEES_FAILED: &str = "Failed to fetch employees";
const CREATE_EMPLOYEE_FAILED: &str = "Failed to create employee";
const FETCH_DETAILS_FAILED: &str = "Failed to fetch employee details";
const UPDATE_EMPLOYEE_FAILED: &str = "Failed to update employee";
const DELETE_EMPLOYEE_FAILED: &str = "Failed to delete employee";

/// Sub-recursos con loading/error propios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSlot {
    List,
    Create,
    Update,
    Delete,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmployeeLoading {
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
    pub details: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeErrors {
    pub list: Option<String>,
    pub create: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeStore {
    employees: Vec<Employee>,
    selected: Option<Employee>,
    filters: EmployeeFilters,
    pagination: Pagination,
    list: Slot,
    create: Slot,
    update: Slot,
    delete: Slot,
    details: Slot,
}

impl EmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn selected(&self) -> Option<&Employee> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &EmployeeFilters {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Vista filtrada, recalculada en cada lectura
    pub fn filtered(&self) -> Vec<&Employee> {
        filter_employees(&self.employees, &self.filters)
    }

    fn slot(&self, slot: EmployeeSlot) -> &Slot {
        match slot {
            EmployeeSlot::List => &self.list,
            EmployeeSlot::Create => &self.create,
            EmployeeSlot::Update => &self.update,
            EmployeeSlot::Delete => &self.delete,
            EmployeeSlot::Details => &self.details,
        }
    }

    fn slot_mut(&mut self, slot: EmployeeSlot) -> &mut Slot {
        match slot {
            EmployeeSlot::List => &mut self.list,
            EmployeeSlot::Create => &mut self.create,
            EmployeeSlot::Update => &mut self.update,
            EmployeeSlot::Delete => &mut self.delete,
            EmployeeSlot::Details => &mut self.details,
        }
    }

    pub fn is_loading(&self, slot: EmployeeSlot) -> bool {
        self.slot(slot).is_loading()
    }

    pub fn error(&self, slot: EmployeeSlot) -> Option<&str> {
        self.slot(slot).error()
    }

    pub fn loading(&self) -> EmployeeLoading {
        EmployeeLoading {
            list: self.list.is_loading(),
            create: self.create.is_loading(),
            update: self.update.is_loading(),
            delete: self.delete.is_loading(),
            details: self.details.is_loading(),
        }
    }

    pub fn errors(&self) -> EmployeeErrors {
        let text = |slot: &Slot| slot.error().map(str::to_string);
        EmployeeErrors {
            list: text(&self.list),
            create: text(&self.create),
            update: text(&self.update),
            delete: text(&self.delete),
            details: text(&self.details),
        }
    }

    pub fn begin(&mut self, slot: EmployeeSlot) -> Ticket {
        self.slot_mut(slot).begin()
    }

    // ========================================================================
    // REDUCERS
    // ========================================================================

    pub fn settle_fetch(&mut self, ticket: Ticket, result: Result<EmployeeListResponse, ApiError>) {
        let Outcome::Applied(response) = self.list.settle_latest(ticket, result, FETCH_EMPLOYEES_FAILED) else {
            return;
        };
        let (employees, pagination) = response.into_parts();
        log::info!("👥 [EMPLOYEES] {} empleados cargados", employees.len());
        self.employees = employees;
        if let Some(patch) = pagination {
            self.pagination.apply(&patch);
        }
    }

    /// Añade el empleado si la respuesta lo trae completo. Devuelve true si el
    /// alta se aplicó pero hay que recargar el listado para verlo.
    pub fn settle_create(&mut self, ticket: Ticket, result: Result<EmployeePatch, ApiError>) -> bool {
        let Outcome::Applied(fields) = self.create.settle(ticket, result, CREATE_EMPLOYEE_FAILED) else {
            return false;
        };
        match serde_json::from_value::<Employee>(Value::Object(fields)) {
            Ok(employee) => {
                upsert(&mut self.employees, employee);
                false
            }
            Err(_) => {
                log::info!("👥 [EMPLOYEES] Alta sin empleado completo en la respuesta, hay que recargar");
                true
            }
        }
    }

    pub fn settle_details(&mut self, ticket: Ticket, result: Result<Employee, ApiError>) {
        if let Outcome::Applied(employee) = self.details.settle_latest(ticket, result, FETCH_DETAILS_FAILED) {
            self.selected = Some(employee);
        }
    }

    /// Mezcla los campos devueltos en el empleado con ese id (lista y
    /// seleccionado). Si el id no está, no se toca nada.
    pub fn settle_update(&mut self, ticket: Ticket, result: Result<(EntityId, EmployeePatch), ApiError>) {
        let Outcome::Applied((id, mut fields)) = self.update.settle(ticket, result, UPDATE_EMPLOYEE_FAILED) else {
            return;
        };
        fields.remove("id");

        let listed = self.employees.iter_mut().find(|e| e.id == id);
        let selected = self.selected.as_mut().filter(|s| s.id == id);
        if listed.is_none() && selected.is_none() {
            log::debug!("🔍 [EMPLOYEES] id {} no está cargado, nada que actualizar", id);
            return;
        }
        for employee in listed.into_iter().chain(selected) {
            match merge_patch(&*employee, &fields) {
                Ok(merged) => *employee = merged,
                Err(e) => log::error!("❌ [EMPLOYEES] No se pudo mezclar la edición de {}: {}", id, e),
            }
        }
    }

    pub fn settle_delete(&mut self, ticket: Ticket, result: Result<EntityId, ApiError>) {
        let Outcome::Applied(id) = self.delete.settle(ticket, result, DELETE_EMPLOYEE_FAILED) else {
            return;
        };
        remove_by_id(&mut self.employees, &id);
        if self.selected.as_ref().map(|s| &s.id) == Some(&id) {
            self.selected = None;
        }
    }

    // ========================================================================
    // ACCIONES SÍNCRONAS
    // ========================================================================

    pub fn set_filters(&mut self, patch: FiltersPatch) {
        if let Some(search) = patch.search {
            self.filters.search = search;
        }
        if let Some(department) = patch.department {
            self.filters.department = department;
        }
        if let Some(status) = patch.status {
            self.filters.status = status;
        }
    }

    pub fn set_pagination(&mut self, patch: PaginationPatch) {
        self.pagination.apply(&patch);
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub fn clear_error(&mut self, slot: EmployeeSlot) {
        self.slot_mut(slot).clear_error();
    }

    pub fn clear_errors(&mut self) {
        for slot in [
            EmployeeSlot::List,
            EmployeeSlot::Create,
            EmployeeSlot::Update,
            EmployeeSlot::Delete,
            EmployeeSlot::Details,
        ] {
            self.clear_error(slot);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Filtro puro: búsqueda sin mayúsculas en nombre/apellido/email, igualdad de
/// nombre de departamento y estado. Filtros vacíos devuelven todo.
pub fn filter_employees<'a>(employees: &'a [Employee], filters: &EmployeeFilters) -> Vec<&'a Employee> {
    let search = filters.search.to_lowercase();
    employees
        .iter()
        .filter(|employee| {
            if search.is_empty() {
                return true;
            }
            [&employee.user.first_name, &employee.user.last_name, &employee.user.email]
                .iter()
                .any(|field| field.to_lowercase().contains(&search))
        })
        .filter(|employee| {
            filters.department.is_empty()
                || employee.department_name.as_deref() == Some(filters.department.as_str())
        })
        .filter(|employee| filters.status.matches(employee.is_active))
        .collect()
}
