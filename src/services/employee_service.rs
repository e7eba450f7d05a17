use crate::models::{Employee, EmployeeListResponse, EmployeePatch, EmployeeUpdate, EntityId, NewEmployee};
use crate::services::api_client::HttpGateway;
use crate::services::error::ApiError;

const EMPLOYEES_PATH: &str = "/employees/api/employees/";

fn employee_path(id: &EntityId) -> String {
    format!("{}{}/", EMPLOYEES_PATH, id)
}

/// Llamadas `employee.*`
pub struct EmployeeApi<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> EmployeeApi<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<EmployeeListResponse, ApiError> {
        self.gateway.get(EMPLOYEES_PATH).await
    }

    pub async fn create(&self, data: &NewEmployee) -> Result<EmployeePatch, ApiError> {
        log::info!("👤 [EMPLOYEE] Alta de {} en empresa {}", data.email, data.company_id);
        self.gateway.post(EMPLOYEES_PATH, data).await
    }

    pub async fn get(&self, id: &EntityId) -> Result<Employee, ApiError> {
        self.gateway.get(&employee_path(id)).await
    }

    pub async fn update(&self, id: &EntityId, data: &EmployeeUpdate) -> Result<EmployeePatch, ApiError> {
        self.gateway.patch(&employee_path(id), data).await
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.gateway.delete(&employee_path(id)).await
    }
}
