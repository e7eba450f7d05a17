// ============================================================================
// EMPLOYEE VIEWMODEL - CRUD de empleados + filtros/paginación
// ============================================================================

use crate::models::{
    Employee, EmployeeListResponse, EmployeePatch, EmployeeUpdate, EntityId, FiltersPatch,
    NewEmployee, PaginationPatch,
};
use crate::services::{ApiError, HttpGateway};
use crate::state::{AppState, EmployeeSlot, SubmissionKind};

#[derive(Clone)]
pub struct EmployeeViewModel {
    gateway: HttpGateway,
    state: AppState,
}

impl EmployeeViewModel {
    pub fn new(gateway: HttpGateway, state: AppState) -> Self {
        Self { gateway, state }
    }

    pub async fn fetch_employees(&self) -> Result<EmployeeListResponse, ApiError> {
        let ticket = self.state.employees.update(|e| e.begin(EmployeeSlot::List));
        let result = self.gateway.employee().list().await;
        self.state.employees.update(|e| e.settle_fetch(ticket, result.clone()));
        result
    }

    /// `company_id` viene en `data`, lo pone quien llama. Si la respuesta no
    /// trae el empleado completo se recarga el listado.
    pub async fn create_employee(&self, data: &NewEmployee) -> Result<EmployeePatch, ApiError> {
        let _permit = self.state.submissions.try_acquire(SubmissionKind::Employee)?;
        let ticket = self.state.employees.update(|e| e.begin(EmployeeSlot::Create));
        let result = self.gateway.employee().create(data).await;
        let reload = self.state.employees.update(|e| e.settle_create(ticket, result.clone()));
        if reload {
            if let Err(e) = self.fetch_employees().await {
                log::warn!("⚠️ [EMPLOYEES] Recarga tras el alta falló: {}", e);
            }
        }
        result
    }

    pub async fn fetch_employee(&self, id: &EntityId) -> Result<Employee, ApiError> {
        let ticket = self.state.employees.update(|e| e.begin(EmployeeSlot::Details));
        let result = self.gateway.employee().get(id).await;
        self.state.employees.update(|e| e.settle_details(ticket, result.clone()));
        result
    }

    /// Devuelve los campos que confirma el servidor
    pub async fn update_employee(&self, id: &EntityId, data: &EmployeeUpdate) -> Result<EmployeePatch, ApiError> {
        let ticket = self.state.employees.update(|e| e.begin(EmployeeSlot::Update));
        let result = self.gateway.employee().update(id, data).await;
        let settled = result.clone().map(|fields| (id.clone(), fields));
        self.state.employees.update(|e| e.settle_update(ticket, settled));
        result
    }

    pub async fn delete_employee(&self, id: &EntityId) -> Result<(), ApiError> {
        let ticket = self.state.employees.update(|e| e.begin(EmployeeSlot::Delete));
        let result = self.gateway.employee().delete(id).await;
        let settled = result.clone().map(|()| id.clone());
        self.state.employees.update(|e| e.settle_delete(ticket, settled));
        result
    }

    /// Vista filtrada con los filtros actuales
    pub fn filtered_employees(&self) -> Vec<Employee> {
        self.state.employees.read(|e| e.filtered().into_iter().cloned().collect())
    }

    pub fn set_filters(&self, patch: FiltersPatch) {
        self.state.employees.update(|e| e.set_filters(patch));
    }

    pub fn set_pagination(&self, patch: PaginationPatch) {
        self.state.employees.update(|e| e.set_pagination(patch));
    }

    pub fn clear_selected(&self) {
        self.state.employees.update(|e| e.clear_selected());
    }

    pub fn clear_error(&self, slot: EmployeeSlot) {
        self.state.employees.update(|e| e.clear_error(slot));
    }

    pub fn clear_errors(&self) {
        self.state.employees.update(|e| e.clear_errors());
    }
}
