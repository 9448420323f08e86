//! Cálculo financiero de viajes
//!
//! Este módulo contiene el motor de liquidación: a partir de las mediciones
//! de un viaje y de las condiciones de facturación de su proyecto calcula el
//! importe bruto, el coste de combustible, el anticipo, la parte del
//! conductor y el beneficio neto. Es puro y síncrono; no toca la base de datos.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::project::ProjectType;

/// Constantes de la política de liquidación
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementPolicy {
    pub fuel_cost_per_liter: Decimal,
    pub advance_rate: Decimal,
    pub driver_rate: Decimal,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            fuel_cost_per_liter: Decimal::from(80),
            advance_rate: Decimal::new(35, 2),
            driver_rate: Decimal::new(20, 2),
        }
    }
}

/// Condiciones de facturación de un proyecto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingTerms {
    pub project_type: ProjectType,
    pub rate: Decimal,
}

/// Mediciones planificadas y reales de un viaje
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripMeasurements {
    pub km: Option<Decimal>,
    pub tons: Option<Decimal>,
    pub days: Option<i32>,
    pub actual_km: Option<Decimal>,
    pub actual_tons: Option<Decimal>,
    pub actual_days: Option<i32>,
    /// Litros de combustible adelantados
    pub fuel_advance: Decimal,
}

impl TripMeasurements {
    /// Valor efectivo para el tipo de facturación: el real si está presente,
    /// si no el planificado, y cero si faltan ambos.
    pub fn effective_value(&self, project_type: ProjectType) -> Decimal {
        match project_type {
            ProjectType::Km => self.actual_km.or(self.km).unwrap_or(Decimal::ZERO),
            ProjectType::MetricTon => self.actual_tons.or(self.tons).unwrap_or(Decimal::ZERO),
            ProjectType::DayRent => self
                .actual_days
                .or(self.days)
                .map(Decimal::from)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// Liquidación derivada de un viaje. Nunca se persiste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub gross_amount: Decimal,
    pub fuel_cost: Decimal,
    pub advance_amount: Decimal,
    pub driver_amount: Decimal,
    pub net_earnings: Decimal,
    pub rate: Decimal,
    pub effective_value: Decimal,
    pub fuel_quantity: Decimal,
    pub fuel_cost_per_liter: Decimal,
}

impl Settlement {
    /// Liquidación vacía usada cuando no hay proyecto o la tarifa no es positiva
    pub fn zero(policy: &SettlementPolicy) -> Self {
        Self {
            gross_amount: Decimal::ZERO,
            fuel_cost: Decimal::ZERO,
            advance_amount: Decimal::ZERO,
            driver_amount: Decimal::ZERO,
            net_earnings: Decimal::ZERO,
            rate: Decimal::ZERO,
            effective_value: Decimal::ZERO,
            fuel_quantity: Decimal::ZERO,
            fuel_cost_per_liter: policy.fuel_cost_per_liter,
        }
    }
}

/// Calculadora de liquidaciones parametrizada por la política
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementCalculator {
    policy: SettlementPolicy,
}

impl SettlementCalculator {
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SettlementPolicy {
        &self.policy
    }

    /// Calcular la liquidación de un viaje.
    ///
    /// Sin proyecto, o con tarifa no positiva, devuelve [`Settlement::zero`].
    pub fn compute(&self, trip: &TripMeasurements, terms: Option<&BillingTerms>) -> Settlement {
        let terms = match terms {
            Some(terms) if terms.rate > Decimal::ZERO => terms,
            _ => return Settlement::zero(&self.policy),
        };

        let effective_value = trip.effective_value(terms.project_type);
        let gross_amount = terms.rate * effective_value;
        let fuel_cost = trip.fuel_advance * self.policy.fuel_cost_per_liter;
        let advance_amount = gross_amount * self.policy.advance_rate;
        let driver_amount = gross_amount * self.policy.driver_rate;
        let net_earnings = gross_amount - fuel_cost - advance_amount - driver_amount;

        Settlement {
            gross_amount,
            fuel_cost,
            advance_amount,
            driver_amount,
            net_earnings,
            rate: terms.rate,
            effective_value,
            fuel_quantity: trip.fuel_advance,
            fuel_cost_per_liter: self.policy.fuel_cost_per_liter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn km_terms(rate: i64) -> BillingTerms {
        BillingTerms {
            project_type: ProjectType::Km,
            rate: Decimal::from(rate),
        }
    }

    fn km_trip(planned: i64, actual: Option<i64>, fuel: i64) -> TripMeasurements {
        TripMeasurements {
            km: Some(Decimal::from(planned)),
            actual_km: actual.map(Decimal::from),
            fuel_advance: Decimal::from(fuel),
            ..Default::default()
        }
    }

    #[test]
    fn test_planned_km_settlement() {
        let calculator = SettlementCalculator::default();
        let settlement = calculator.compute(&km_trip(50, None, 10), Some(&km_terms(100)));

        assert_eq!(settlement.gross_amount, Decimal::from(5000));
        assert_eq!(settlement.fuel_cost, Decimal::from(800));
        assert_eq!(settlement.advance_amount, Decimal::from(1750));
        assert_eq!(settlement.driver_amount, Decimal::from(1000));
        assert_eq!(settlement.net_earnings, Decimal::from(1450));
        assert_eq!(settlement.effective_value, Decimal::from(50));
        assert_eq!(settlement.fuel_quantity, Decimal::from(10));
    }

    #[test]
    fn test_actual_km_overrides_planned() {
        let calculator = SettlementCalculator::default();
        let settlement = calculator.compute(&km_trip(50, Some(70), 10), Some(&km_terms(100)));

        assert_eq!(settlement.gross_amount, Decimal::from(7000));
        assert_eq!(settlement.fuel_cost, Decimal::from(800));
        assert_eq!(settlement.advance_amount, Decimal::from(2450));
        assert_eq!(settlement.driver_amount, Decimal::from(1400));
        assert_eq!(settlement.net_earnings, Decimal::from(2350));
    }

    #[test]
    fn test_actual_zero_is_still_actual() {
        let calculator = SettlementCalculator::default();
        let settlement = calculator.compute(&km_trip(50, Some(0), 0), Some(&km_terms(100)));

        assert_eq!(settlement.effective_value, Decimal::ZERO);
        assert_eq!(settlement.gross_amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_project_falls_back_to_zero() {
        let calculator = SettlementCalculator::default();
        let settlement = calculator.compute(&km_trip(50, None, 10), None);

        assert_eq!(settlement, Settlement::zero(calculator.policy()));
        assert_eq!(settlement.fuel_cost_per_liter, Decimal::from(80));
        assert_eq!(settlement.fuel_cost, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_rate_falls_back_to_zero() {
        let calculator = SettlementCalculator::default();
        let settlement = calculator.compute(&km_trip(50, None, 10), Some(&km_terms(0)));

        assert_eq!(settlement.net_earnings, Decimal::ZERO);
        assert_eq!(settlement.rate, Decimal::ZERO);
    }

    #[test]
    fn test_tons_and_days_pick_their_own_measurement() {
        let calculator = SettlementCalculator::default();
        let trip = TripMeasurements {
            km: Some(Decimal::from(999)),
            tons: Some(Decimal::new(125, 1)),
            days: Some(3),
            actual_days: Some(4),
            fuel_advance: Decimal::ZERO,
            ..Default::default()
        };

        let tons = calculator.compute(
            &trip,
            Some(&BillingTerms { project_type: ProjectType::MetricTon, rate: Decimal::from(200) }),
        );
        assert_eq!(tons.effective_value, Decimal::new(125, 1));
        assert_eq!(tons.gross_amount, Decimal::from(2500));

        let days = calculator.compute(
            &trip,
            Some(&BillingTerms { project_type: ProjectType::DayRent, rate: Decimal::from(1500) }),
        );
        assert_eq!(days.effective_value, Decimal::from(4));
        assert_eq!(days.gross_amount, Decimal::from(6000));
    }

    #[test]
    fn test_missing_measurement_is_zero() {
        let calculator = SettlementCalculator::default();
        let trip = TripMeasurements {
            km: Some(Decimal::from(40)),
            fuel_advance: Decimal::from(5),
            ..Default::default()
        };
        let settlement = calculator.compute(
            &trip,
            Some(&BillingTerms { project_type: ProjectType::MetricTon, rate: Decimal::from(300) }),
        );

        assert_eq!(settlement.effective_value, Decimal::ZERO);
        assert_eq!(settlement.gross_amount, Decimal::ZERO);
        assert_eq!(settlement.net_earnings, Decimal::from(-400));
    }

    #[test]
    fn test_settlement_identities_hold_exactly() {
        let calculator = SettlementCalculator::default();
        let trip = TripMeasurements {
            km: Some(Decimal::new(12_345, 2)),
            actual_km: Some(Decimal::new(13_377, 3)),
            fuel_advance: Decimal::new(4_321, 2),
            ..Default::default()
        };
        let terms = BillingTerms {
            project_type: ProjectType::Km,
            rate: Decimal::new(3_333, 2),
        };
        let s = calculator.compute(&trip, Some(&terms));

        assert_eq!(s.advance_amount + s.driver_amount, Decimal::new(55, 2) * s.gross_amount);
        assert_eq!(
            s.net_earnings,
            s.gross_amount - s.fuel_cost - s.advance_amount - s.driver_amount
        );
    }

    #[test]
    fn test_compute_is_idempotent() {
        let calculator = SettlementCalculator::default();
        let trip = km_trip(80, Some(75), 12);
        let terms = km_terms(45);

        assert_eq!(
            calculator.compute(&trip, Some(&terms)),
            calculator.compute(&trip, Some(&terms))
        );
    }

    #[test]
    fn test_custom_policy() {
        let calculator = SettlementCalculator::new(SettlementPolicy {
            fuel_cost_per_liter: Decimal::from(100),
            advance_rate: Decimal::new(30, 2),
            driver_rate: Decimal::new(10, 2),
        });
        let s = calculator.compute(&km_trip(10, None, 1), Some(&km_terms(100)));

        assert_eq!(s.fuel_cost, Decimal::from(100));
        assert_eq!(s.advance_amount, Decimal::from(300));
        assert_eq!(s.driver_amount, Decimal::from(100));
        assert_eq!(s.net_earnings, Decimal::from(500));
    }
}
