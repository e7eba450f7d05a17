pub mod auth;
pub mod company;
pub mod employee;
pub mod id;
pub mod user;

pub use auth::{LoginRequest, ProfilePatch, RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, TokenResponse};
pub use company::{
    AdminUser, CompanyProfile, CompanyProfilePatch, CompanyRegistration, Department,
    DepartmentUpdate, NewAdminUser, NewDepartment,
};
pub use employee::{
    Employee, EmployeeFilters, EmployeeListResponse, EmployeePatch, EmployeeUpdate, EmployeeUser, FiltersPatch,
    NewEmployee, Pagination, PaginationPatch, StatusFilter,
};
pub use id::EntityId;
pub use user::{Role, User};

/// Entidades con id, para los reducers genéricos de colecciones
pub trait Identified {
    fn id(&self) -> &EntityId;
}

impl Identified for Department {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Identified for AdminUser {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Identified for Employee {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
