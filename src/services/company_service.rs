use crate::models::{
    AdminUser, CompanyProfile, CompanyProfilePatch, CompanyRegistration, Department,
    DepartmentUpdate, EntityId, NewAdminUser, NewDepartment,
};
use crate::services::api_client::HttpGateway;
use crate::services::error::ApiError;

const REGISTER_PATH: &str = "/companies/api/register/";
const DEPARTMENTS_PATH: &str = "/companies/api/departments/";
const ADMIN_USERS_PATH: &str = "/companies/api/admin-users/";

fn profile_path(company_id: &EntityId) -> String {
    format!("/companies/api/profile/{}/", company_id)
}

fn department_path(id: &EntityId) -> String {
    format!("{}{}/", DEPARTMENTS_PATH, id)
}

fn admin_user_path(id: &EntityId) -> String {
    format!("{}{}/", ADMIN_USERS_PATH, id)
}

/// Llamadas `company.*`
pub struct CompanyApi<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> CompanyApi<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    pub async fn profile(&self, company_id: &EntityId) -> Result<CompanyProfile, ApiError> {
        self.gateway.get(&profile_path(company_id)).await
    }

    pub async fn update_profile(
        &self,
        company_id: &EntityId,
        data: &CompanyProfilePatch,
    ) -> Result<CompanyProfilePatch, ApiError> {
        self.gateway.patch(&profile_path(company_id), data).await
    }

    pub async fn register(&self, data: &CompanyRegistration) -> Result<CompanyProfile, ApiError> {
        log::info!("🏢 [COMPANY] Registrando empresa {}", data.name);
        self.gateway.post(REGISTER_PATH, data).await
    }

    pub async fn departments(&self) -> Result<Vec<Department>, ApiError> {
        self.gateway.get(DEPARTMENTS_PATH).await
    }

    pub async fn create_department(&self, data: &NewDepartment) -> Result<Department, ApiError> {
        self.gateway.post(DEPARTMENTS_PATH, data).await
    }

    pub async fn update_department(
        &self,
        id: &EntityId,
        data: &DepartmentUpdate,
    ) -> Result<Department, ApiError> {
        self.gateway.patch(&department_path(id), data).await
    }

    pub async fn delete_department(&self, id: &EntityId) -> Result<(), ApiError> {
        self.gateway.delete(&department_path(id)).await
    }

    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.gateway.get(ADMIN_USERS_PATH).await
    }

    pub async fn create_admin_user(&self, data: &NewAdminUser) -> Result<AdminUser, ApiError> {
        self.gateway.post(ADMIN_USERS_PATH, data).await
    }

    pub async fn delete_admin_user(&self, id: &EntityId) -> Result<(), ApiError> {
        self.gateway.delete(&admin_user_path(id)).await
    }
}
