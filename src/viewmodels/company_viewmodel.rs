// ============================================================================
// COMPANY VIEWMODEL - Perfil, departamentos y admins
// ============================================================================

use crate::models::{
    AdminUser, CompanyProfile, CompanyProfilePatch, CompanyRegistration, Department,
    DepartmentUpdate, EntityId, NewAdminUser, NewDepartment,
};
use crate::services::{ApiError, HttpGateway};
use crate::state::{AppState, SubmissionKind};

#[derive(Clone)]
pub struct CompanyViewModel {
    gateway: HttpGateway,
    state: AppState,
}

impl CompanyViewModel {
    pub fn new(gateway: HttpGateway, state: AppState) -> Self {
        Self { gateway, state }
    }

    /// Empresa del usuario de la sesión, si tiene
    pub fn session_company_id(&self) -> Option<EntityId> {
        self.state.session.read(|s| s.company_id().cloned())
    }

    // ========================================================================
    // PERFIL
    // ========================================================================

    pub async fn fetch_profile(&self, company_id: &EntityId) -> Result<CompanyProfile, ApiError> {
        let ticket = self.state.company.update(|c| c.begin_profile());
        let result = self.gateway.company().profile(company_id).await;
        self.state.company.update(|c| c.settle_fetch_profile(ticket, result.clone()));
        result
    }

    pub async fn update_profile(
        &self,
        company_id: &EntityId,
        patch: &CompanyProfilePatch,
    ) -> Result<CompanyProfilePatch, ApiError> {
        let ticket = self.state.company.update(|c| c.begin_profile());
        let result = self.gateway.company().update_profile(company_id, patch).await;
        self.state.company.update(|c| c.settle_update_profile(ticket, result.clone()));
        result
    }

    /// Alta de empresa para un usuario ya autenticado
    pub async fn register_company(&self, data: &CompanyRegistration) -> Result<CompanyProfile, ApiError> {
        let _permit = self.state.submissions.try_acquire(SubmissionKind::Company)?;
        let ticket = self.state.company.update(|c| c.begin_profile());
        let result = self.gateway.company().register(data).await;
        self.state.company.update(|c| c.settle_register_company(ticket, result.clone()));
        result
    }

    // ========================================================================
    // DEPARTAMENTOS
    // ========================================================================

    pub async fn fetch_departments(&self) -> Result<Vec<Department>, ApiError> {
        let ticket = self.state.company.update(|c| c.begin_departments());
        let result = self.gateway.company().departments().await;
        self.state.company.update(|c| c.settle_fetch_departments(ticket, result.clone()));
        result
    }

    /// Un segundo alta mientras hay otra en vuelo se rechaza sin tocar el estado
    pub async fn create_department(&self, data: &NewDepartment) -> Result<Department, ApiError> {
        let _permit = self.state.submissions.try_acquire(SubmissionKind::Department)?;
        let ticket = self.state.company.update(|c| c.begin_departments());
        let result = self.gateway.company().create_department(data).await;
        self.state.company.update(|c| c.settle_create_department(ticket, result.clone()));
        result
    }

    pub async fn update_department(
        &self,
        id: &EntityId,
        data: &DepartmentUpdate,
    ) -> Result<Department, ApiError> {
        let ticket = self.state.company.update(|c| c.begin_departments());
        let result = self.gateway.company().update_department(id, data).await;
        self.state.company.update(|c| c.settle_update_department(ticket, result.clone()));
        result
    }

    pub async fn delete_department(&self, id: &EntityId) -> Result<(), ApiError> {
        let ticket = self.state.company.update(|c| c.begin_departments());
        let result = self.gateway.company().delete_department(id).await;
        let settled = result.clone().map(|()| id.clone());
        self.state.company.update(|c| c.settle_delete_department(ticket, settled));
        result
    }

    // ========================================================================
    // ADMIN USERS
    // ========================================================================

    pub async fn fetch_admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let ticket = self.state.company.update(|c| c.begin_admin_users());
        let result = self.gateway.company().admin_users().await;
        self.state.company.update(|c| c.settle_fetch_admin_users(ticket, result.clone()));
        result
    }

    pub async fn create_admin_user(&self, data: &NewAdminUser) -> Result<AdminUser, ApiError> {
        let _permit = self.state.submissions.try_acquire(SubmissionKind::AdminUser)?;
        let ticket = self.state.company.update(|c| c.begin_admin_users());
        let result = self.gateway.company().create_admin_user(data).await;
        self.state.company.update(|c| c.settle_create_admin_user(ticket, result.clone()));
        result
    }

    pub async fn delete_admin_user(&self, id: &EntityId) -> Result<(), ApiError> {
        let ticket = self.state.company.update(|c| c.begin_admin_users());
        let result = self.gateway.company().delete_admin_user(id).await;
        let settled = result.clone().map(|()| id.clone());
        self.state.company.update(|c| c.settle_delete_admin_user(ticket, settled));
        result
    }

    // ========================================================================
    // ERRORES
    // ========================================================================

    pub fn clear_errors(&self) {
        self.state.company.update(|c| c.clear_errors());
    }

    pub fn clear_department_error(&self) {
        self.state.company.update(|c| c.clear_department_error());
    }

    pub fn clear_admin_user_error(&self) {
        self.state.company.update(|c| c.clear_admin_user_error());
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::services::http::{HttpResponse, Method};
    use crate::viewmodels::test_support::fixture;

    fn new_department(name: &str) -> NewDepartment {
        NewDepartment { name: name.to_string(), description: None }
    }

    #[test]
    fn test_create_department_appends() {
        let f = fixture();
        f.transport
            .expect(Method::Get, "/companies/api/departments/", 200, r#"[{"id": 1, "name": "Sales"}]"#)
            .expect(Method::Post, "/companies/api/departments/", 201, r#"{"id": 2, "name": "Ops"}"#);
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(vm.fetch_departments()).unwrap();
        let created = block_on(vm.create_department(&new_department("Ops"))).unwrap();
        assert_eq!(created.id, EntityId::from(2u64));

        let names: Vec<String> = f.state.company.read(|c| c.departments().iter().map(|d| d.name.clone()).collect());
        assert_eq!(names, vec!["Sales", "Ops"]);
        assert!(!f.state.submissions.is_active(SubmissionKind::Department));
    }

    #[test]
    fn test_duplicate_name_error_leaves_list_untouched() {
        let f = fixture();
        f.transport.expect(
            Method::Post,
            "/companies/api/departments/",
            400,
            r#"{"error": "Department with this name already exists"}"#,
        );
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        assert!(block_on(vm.create_department(&new_department("Sales"))).is_err());
        let (count, error) = f.state.company.read(|c| (c.departments().len(), c.errors().departments));
        assert_eq!(count, 0);
        assert_eq!(error.as_deref(), Some("Department with this name already exists"));

        vm.clear_department_error();
        assert_eq!(f.state.company.read(|c| c.errors().departments), None);
    }

    #[test]
    fn test_second_create_while_first_in_flight_is_rejected_locally() {
        let f = fixture();
        let reply = f.transport.expect_deferred(Method::Post, "/companies/api/departments/");
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        let data = new_department("Ops");
        let mut first = Box::pin(vm.create_department(&data));
        block_on(async {
            assert!(futures::poll!(first.as_mut()).is_pending());
        });

        let second = block_on(vm.create_department(&data));
        assert_eq!(second.unwrap_err(), ApiError::DuplicateSubmission);
        // El rechazo local no toca el error del slot
        assert_eq!(f.state.company.read(|c| c.errors().departments), None);

        reply.send(Ok(HttpResponse::new(201, r#"{"id": 9, "name": "Ops"}"#))).unwrap();
        block_on(first).unwrap();
        assert_eq!(f.state.company.read(|c| c.departments().len()), 1);
        assert_eq!(f.transport.requests().len(), 1);
    }

    #[test]
    fn test_delete_department_removes_by_id() {
        let f = fixture();
        f.transport
            .expect(
                Method::Get,
                "/companies/api/departments/",
                200,
                r#"[{"id": "d-1", "name": "Sales"}, {"id": "d-2", "name": "Ops"}]"#,
            )
            .expect(Method::Delete, "/companies/api/departments/d-1/", 204, "");
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(vm.fetch_departments()).unwrap();
        block_on(vm.delete_department(&EntityId::from("d-1"))).unwrap();
        let ids: Vec<String> = f.state.company.read(|c| c.departments().iter().map(|d| d.id.to_string()).collect());
        assert_eq!(ids, vec!["d-2"]);
    }

    #[test]
    fn test_update_department_replaces_in_place() {
        let f = fixture();
        f.transport
            .expect(Method::Get, "/companies/api/departments/", 200, r#"[{"id": 1, "name": "Sales"}]"#)
            .expect(Method::Patch, "/companies/api/departments/1/", 200, r#"{"id": 1, "name": "Sales EU"}"#);
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(vm.fetch_departments()).unwrap();
        let update = DepartmentUpdate { name: Some("Sales EU".into()), description: None };
        block_on(vm.update_department(&EntityId::from(1u64), &update)).unwrap();
        assert_eq!(f.state.company.read(|c| c.departments()[0].name.clone()), "Sales EU");
        assert_eq!(
            f.transport.requests()[1].body.as_deref(),
            Some(r#"{"name":"Sales EU"}"#)
        );
    }

    #[test]
    fn test_admin_users_failure_does_not_touch_departments() {
        let f = fixture();
        f.transport
            .expect(Method::Get, "/companies/api/departments/", 200, r#"[{"id": 1, "name": "Sales"}]"#)
            .expect(Method::Get, "/companies/api/admin-users/", 500, "");
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        block_on(vm.fetch_departments()).unwrap();
        assert!(block_on(vm.fetch_admin_users()).is_err());

        let errors = f.state.company.read(|c| c.errors());
        assert_eq!(errors.admin_users.as_deref(), Some("Failed to fetch admin users"));
        assert_eq!(errors.departments, None);
        assert_eq!(f.state.company.read(|c| c.departments().len()), 1);
    }

    #[test]
    fn test_admin_user_lifecycle() {
        let f = fixture();
        f.transport
            .expect(Method::Post, "/companies/api/admin-users/", 201, r#"{"id": "a-1", "email": "ops@acme.test"}"#)
            .expect(Method::Delete, "/companies/api/admin-users/a-1/", 204, "");
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());

        let data = NewAdminUser {
            email: "ops@acme.test".into(),
            first_name: "Ops".into(),
            last_name: "Lead".into(),
            password: "pw".into(),
            phone: None,
        };
        block_on(vm.create_admin_user(&data)).unwrap();
        assert_eq!(f.state.company.read(|c| c.admin_users().len()), 1);

        block_on(vm.delete_admin_user(&EntityId::from("a-1"))).unwrap();
        assert!(f.state.company.read(|c| c.admin_users().is_empty()));
    }

    #[test]
    fn test_profile_fetch_update_and_register() {
        let f = fixture();
        f.transport
            .expect(Method::Get, "/companies/api/profile/c-1/", 200, r#"{"id": "c-1", "name": "Acme", "city": "Lyon"}"#)
            .expect(Method::Patch, "/companies/api/profile/c-1/", 200, r#"{"name": "Acme SA"}"#)
            .expect(Method::Post, "/companies/api/register/", 201, r#"{"id": "c-2", "name": "Beta"}"#);
        let vm = CompanyViewModel::new(f.gateway.clone(), f.state.clone());
        let company_id = EntityId::from("c-1");

        block_on(vm.fetch_profile(&company_id)).unwrap();
        let patch = json!({ "name": "Acme SA" });
        block_on(vm.update_profile(&company_id, patch.as_object().unwrap())).unwrap();
        let profile = f.state.company.read(|c| c.profile().cloned()).unwrap();
        assert_eq!(profile.name, "Acme SA");
        assert_eq!(profile.city.as_deref(), Some("Lyon"));

        let registration = CompanyRegistration {
            name: "Beta".into(),
            registration_number: "RC-2".into(),
            ..Default::default()
        };
        block_on(vm.register_company(&registration)).unwrap();
        assert_eq!(f.state.company.read(|c| c.profile().map(|p| p.name.clone())).as_deref(), Some("Beta"));
        assert!(!f.state.company.read(|c| c.loading().profile));
    }
}
