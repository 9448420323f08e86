//! Services module
//!
//! Este módulo contiene la lógica de negocio pura de la aplicación:
//! liquidación de viajes, máquina de estados de viajes y agregación de
//! informes. Ningún servicio accede a la base de datos.

pub mod report_aggregator;
pub mod settlement;
pub mod trip_status;

pub use report_aggregator::{BillableTrip, ProjectLookup, ReportAggregator, ReportSummary};
pub use settlement::{BillingTerms, Settlement, SettlementCalculator, SettlementPolicy, TripMeasurements};
pub use trip_status::{InvalidTransition, StatusChange, TripProgress};
