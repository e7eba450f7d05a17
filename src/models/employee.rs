use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// Usuario embebido en un empleado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUser {
    pub id: EntityId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub user: EmployeeUser,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub department: Option<EntityId>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub company: Option<EntityId>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Alta de empleado. `company_id` lo aporta quien llama (normalmente la
/// empresa del usuario de la sesión); la validación es cosa del servidor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub company_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<EntityId>,
}

/// Respuesta de alta/edición: el backend solo devuelve los campos legibles
/// de su serializer (p. ej. `{role, is_active, department}` en un PATCH), no
/// el empleado completo
pub type EmployeePatch = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<EntityId>,
}

/// Filtro por estado del listado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, is_active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => is_active,
            StatusFilter::Inactive => !is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeFilters {
    pub search: String,
    pub department: String,
    pub status: StatusFilter,
}

/// Cambios parciales de filtros (`{ ...filters, ...patch }`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FiltersPatch {
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_items: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: 10,
            total_items: 0,
        }
    }
}

/// Metadatos de paginación parciales: los campos ausentes se conservan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationPatch {
    #[serde(default, rename = "currentPage", alias = "current_page")]
    pub current_page: Option<u32>,
    #[serde(default, rename = "totalPages", alias = "total_pages")]
    pub total_pages: Option<u32>,
    #[serde(default, rename = "pageSize", alias = "page_size")]
    pub page_size: Option<u32>,
    #[serde(default, rename = "totalItems", alias = "total_items")]
    pub total_items: Option<u64>,
}

impl Pagination {
    pub fn apply(&mut self, patch: &PaginationPatch) {
        if let Some(current_page) = patch.current_page {
            self.current_page = current_page;
        }
        if let Some(total_pages) = patch.total_pages {
            self.total_pages = total_pages;
        }
        if let Some(page_size) = patch.page_size {
            self.page_size = page_size;
        }
        if let Some(total_items) = patch.total_items {
            self.total_items = total_items;
        }
    }
}

/// Respuesta del listado: array plano, `{results, pagination}` o página DRF
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EmployeeListResponse {
    Plain(Vec<Employee>),
    Page {
        results: Vec<Employee>,
        #[serde(default)]
        pagination: Option<PaginationPatch>,
        #[serde(default)]
        count: Option<u64>,
    },
}

impl EmployeeListResponse {
    /// Separa la colección de los metadatos de paginación (si los hay)
    pub fn into_parts(self) -> (Vec<Employee>, Option<PaginationPatch>) {
        match self {
            EmployeeListResponse::Plain(employees) => (employees, None),
            EmployeeListResponse::Page { results, pagination, count } => {
                let pagination = match (pagination, count) {
                    (Some(mut patch), Some(count)) => {
                        patch.total_items.get_or_insert(count);
                        Some(patch)
                    }
                    (Some(patch), None) => Some(patch),
                    (None, Some(count)) => Some(PaginationPatch {
                        total_items: Some(count),
                        ..Default::default()
                    }),
                    (None, None) => None,
                };
                (results, pagination)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_shapes() {
        let plain: EmployeeListResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(plain.into_parts(), (vec![], None));

        let drf: EmployeeListResponse =
            serde_json::from_str(r#"{"count": 42, "next": null, "previous": null, "results": []}"#)
                .unwrap();
        let (_, patch) = drf.into_parts();
        assert_eq!(patch.unwrap().total_items, Some(42));

        let custom: EmployeeListResponse =
            serde_json::from_str(r#"{"results": [], "pagination": {"currentPage": 3}}"#).unwrap();
        let (_, patch) = custom.into_parts();
        let patch = patch.unwrap();
        assert_eq!(patch.current_page, Some(3));
        assert_eq!(patch.page_size, None);
    }

    #[test]
    fn test_pagination_patch_keeps_missing_fields() {
        let mut pagination = Pagination::default();
        pagination.apply(&PaginationPatch { total_pages: Some(4), ..Default::default() });
        assert_eq!(
            pagination,
            Pagination { current_page: 1, total_pages: 4, page_size: 10, total_items: 0 }
        );
    }
}
