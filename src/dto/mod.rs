//! DTOs de la API
//!
//! Formas de request y response de cada recurso.

pub mod auth_dto;
pub mod common_dto;
pub mod driver_dto;
pub mod project_dto;
pub mod report_dto;
pub mod trip_dto;
pub mod vehicle_dto;
pub mod vehicle_group_dto;

pub use common_dto::{ApiResponse, PageQuery, PaginatedResponse, Pagination};
