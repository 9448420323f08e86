//! Controladores
//!
//! Orquestan los casos de uso de cada recurso: validan referencias del
//! inquilino, llaman a los repositorios y a los servicios de dominio, y
//! devuelven el `ApiResponse` listo para serializar.

pub mod auth_controller;
pub mod driver_controller;
pub mod project_controller;
pub mod report_controller;
pub mod trip_controller;
pub mod vehicle_controller;
pub mod vehicle_group_controller;
