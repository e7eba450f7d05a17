pub mod api_client;
pub mod auth_service;
pub mod company_service;
pub mod employee_service;
pub mod error;
pub mod http;

pub use api_client::{HttpGateway, UnauthorizedHandler};
pub use auth_service::AuthApi;
pub use company_service::CompanyApi;
pub use employee_service::EmployeeApi;
pub use error::ApiError;
