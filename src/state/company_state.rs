// ============================================================================
// COMPANY STATE - Perfil, departamentos y admins de la empresa
// ============================================================================
// Tres slots independientes: profile, departments, admin_users. Un fallo en
// uno no toca los otros dos.
// ============================================================================

use serde_json::Value;

use crate::models::{AdminUser, CompanyProfile, CompanyProfilePatch, Department, EntityId};
use crate::services::error::ApiError;
use crate::state::collection::{remove_by_id, replace_by_id, upsert};
use crate::state::operation::{Outcome, Slot, Ticket};
use crate::utils::merge_patch;

const FETCH_PROFILE_FAILED: &str = "Failed to fetch company profile";
const UPDATE_PROFILE_FAILED: &str = "Failed to update company profile";
const REGISTER_COMPANY_FAILED: &str = "Failed to register company";
const FETCH_DEPARTMENTS_FAILED: &str = "Failed to fetch departments";
const CREATE_DEPARTMENT_FAILED: &str = "Failed to create department";
const UPDATE_DEPARTMENT_FAILED: &str = "Failed to update department";
const DELETE_DEPARTMENT_FAILED: &str = "Failed to delete department";
const FETCH_ADMIN_USERS_FAILED: &str = "Failed to fetch admin users";
const CREATE_ADMIN_USER_FAILED: &str = "Failed to create admin user";
const DELETE_ADMIN_USER_FAILED: &str = "Failed to delete admin user";

/// Flags de carga por sub-recurso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompanyLoading {
    pub profile: bool,
    pub departments: bool,
    pub admin_users: bool,
}

/// Errores por sub-recurso
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyErrors {
    pub profile: Option<String>,
    pub departments: Option<String>,
    pub admin_users: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyStore {
    profile: Option<CompanyProfile>,
    departments: Vec<Department>,
    admin_users: Vec<AdminUser>,
    profile_slot: Slot,
    departments_slot: Slot,
    admin_users_slot: Slot,
}

impl CompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&CompanyProfile> {
        self.profile.as_ref()
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn admin_users(&self) -> &[AdminUser] {
        &self.admin_users
    }

    pub fn loading(&self) -> CompanyLoading {
        CompanyLoading {
            profile: self.profile_slot.is_loading(),
            departments: self.departments_slot.is_loading(),
            admin_users: self.admin_users_slot.is_loading(),
        }
    }

    pub fn errors(&self) -> CompanyErrors {
        CompanyErrors {
            profile: self.profile_slot.error().map(str::to_string),
            departments: self.departments_slot.error().map(str::to_string),
            admin_users: self.admin_users_slot.error().map(str::to_string),
        }
    }

    pub fn clear_errors(&mut self) {
        self.profile_slot.clear_error();
        self.departments_slot.clear_error();
        self.admin_users_slot.clear_error();
    }

    pub fn clear_department_error(&mut self) {
        self.departments_slot.clear_error();
    }

    pub fn clear_admin_user_error(&mut self) {
        self.admin_users_slot.clear_error();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ========================================================================
    // PERFIL
    // ========================================================================

    pub fn begin_profile(&mut self) -> Ticket {
        self.profile_slot.begin()
    }

    pub fn settle_fetch_profile(&mut self, ticket: Ticket, result: Result<CompanyProfile, ApiError>) {
        if let Outcome::Applied(profile) = self.profile_slot.settle_latest(ticket, result, FETCH_PROFILE_FAILED) {
            log::info!("🏢 [COMPANY] Perfil cargado: {}", profile.name);
            self.profile = Some(profile);
        }
    }

    pub fn settle_register_company(&mut self, ticket: Ticket, result: Result<CompanyProfile, ApiError>) {
        if let Outcome::Applied(profile) = self.profile_slot.settle(ticket, result, REGISTER_COMPANY_FAILED) {
            log::info!("🏢 [COMPANY] Empresa registrada: {}", profile.name);
            self.profile = Some(profile);
        }
    }

    /// `{ ...profile, ...respuesta }`
    pub fn settle_update_profile(&mut self, ticket: Ticket, result: Result<CompanyProfilePatch, ApiError>) {
        let Some(patch) = self.profile_slot.settle(ticket, result, UPDATE_PROFILE_FAILED).applied() else {
            return;
        };
        let merged = match self.profile.as_ref() {
            Some(profile) => merge_patch(profile, &patch),
            None => serde_json::from_value(Value::Object(patch)),
        };
        match merged {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => log::error!("❌ [COMPANY] Perfil devuelto no aplicable: {}", e),
        }
    }

    // ========================================================================
    // DEPARTAMENTOS
    // ========================================================================

    pub fn begin_departments(&mut self) -> Ticket {
        self.departments_slot.begin()
    }

    pub fn settle_fetch_departments(&mut self, ticket: Ticket, result: Result<Vec<Department>, ApiError>) {
        if let Outcome::Applied(departments) =
            self.departments_slot.settle_latest(ticket, result, FETCH_DEPARTMENTS_FAILED)
        {
            log::info!("📋 [COMPANY] {} departamentos", departments.len());
            self.departments = departments;
        }
    }

    pub fn settle_create_department(&mut self, ticket: Ticket, result: Result<Department, ApiError>) {
        if let Outcome::Applied(department) =
            self.departments_slot.settle(ticket, result, CREATE_DEPARTMENT_FAILED)
        {
            upsert(&mut self.departments, department);
        }
    }

    pub fn settle_update_department(&mut self, ticket: Ticket, result: Result<Department, ApiError>) {
        if let Outcome::Applied(department) =
            self.departments_slot.settle(ticket, result, UPDATE_DEPARTMENT_FAILED)
        {
            replace_by_id(&mut self.departments, department);
        }
    }

    pub fn settle_delete_department(&mut self, ticket: Ticket, result: Result<EntityId, ApiError>) {
        if let Outcome::Applied(id) = self.departments_slot.settle(ticket, result, DELETE_DEPARTMENT_FAILED) {
            remove_by_id(&mut self.departments, &id);
        }
    }

    // ========================================================================
    // ADMIN USERS
    // ========================================================================

    pub fn begin_admin_users(&mut self) -> Ticket {
        self.admin_users_slot.begin()
    }

    pub fn settle_fetch_admin_users(&mut self, ticket: Ticket, result: Result<Vec<AdminUser>, ApiError>) {
        if let Outcome::Applied(admin_users) =
            self.admin_users_slot.settle_latest(ticket, result, FETCH_ADMIN_USERS_FAILED)
        {
            self.admin_users = admin_users;
        }
    }

    pub fn settle_create_admin_user(&mut self, ticket: Ticket, result: Result<AdminUser, ApiError>) {
        if let Outcome::Applied(admin_user) =
            self.admin_users_slot.settle(ticket, result, CREATE_ADMIN_USER_FAILED)
        {
            upsert(&mut self.admin_users, admin_user);
        }
    }

    pub fn settle_delete_admin_user(&mut self, ticket: Ticket, result: Result<EntityId, ApiError>) {
        if let Outcome::Applied(id) = self.admin_users_slot.settle(ticket, result, DELETE_ADMIN_USER_FAILED) {
            remove_by_id(&mut self.admin_users, &id);
        }
    }
}
