//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod admin;
pub mod driver;
pub mod project;
pub mod trip;
pub mod vehicle;
pub mod vehicle_group;

pub use admin::Admin;
pub use driver::Driver;
pub use project::{Project, ProjectType};
pub use trip::{Trip, TripStatus};
pub use vehicle::{Vehicle, VehicleWithGroup};
pub use vehicle_group::{VehicleGroup, VehicleGroupWithCount};
