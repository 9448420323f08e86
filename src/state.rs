//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::report_aggregator::ReportAggregator;
use crate::services::settlement::SettlementCalculator;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub calculator: SettlementCalculator,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let calculator = SettlementCalculator::new(config.settlement);
        Self {
            pool,
            config,
            calculator,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }

    pub fn aggregator(&self) -> ReportAggregator {
        ReportAggregator::new(self.calculator)
    }
}
