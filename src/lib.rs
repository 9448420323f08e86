//! Back office de gestión de flotas de transporte
//!
//! API multi-inquilino para administrar conductores, vehículos, grupos de
//! vehículos, proyectos y viajes, con la liquidación de cada viaje y los
//! informes agregados.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
