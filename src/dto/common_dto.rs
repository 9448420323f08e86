//! DTOs comunes
//!
//! Envoltorio de respuesta de la API y paginación compartida por los listados.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Parámetros de paginación y búsqueda
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Patrón ILIKE para la búsqueda, si hay texto
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 { (total_items + limit - 1) / limit } else { 0 };
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total_items: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(query.page(), query.limit(), total_items),
        }
    }
}

/// Distinguir un campo ausente (`None`) de un `null` explícito (`Some(None)`).
/// Se usa con `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Recuento por categoría para las estadísticas
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults_and_clamps() {
        let query = PageQuery::default();
        assert_eq!((query.page(), query.limit(), query.offset()), (1, 10, 0));

        let query = PageQuery { page: Some(3), limit: Some(500), search: None };
        assert_eq!((query.page(), query.limit(), query.offset()), (3, 100, 200));

        let query = PageQuery { page: Some(0), limit: Some(-5), search: None };
        assert_eq!((query.page(), query.limit()), (1, 10));
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = PageQuery { search: Some(" 50%_off ".into()), ..Default::default() };
        assert_eq!(query.search_pattern().as_deref(), Some("%50\\%\\_off%"));
        let blank = PageQuery { search: Some("   ".into()), ..Default::default() };
        assert_eq!(blank.search_pattern(), None);
    }

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_double_option() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "double_option")]
            value: Option<Option<i32>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"value": 4}"#).unwrap();
        assert_eq!(absent.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some(4)));
    }

    #[test]
    fn test_api_response_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "message": "done" }));
    }
}
