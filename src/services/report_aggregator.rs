//! Agregación de informes
//!
//! Suma las liquidaciones de un conjunto de viajes. El proyecto de cada viaje
//! se resuelve a través de [`ProjectLookup`]; un proyecto que no se encuentra
//! liquida a cero y nunca aborta la agregación.

use std::collections::HashMap;
use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::project::ProjectType;
use crate::services::settlement::{BillingTerms, SettlementCalculator, TripMeasurements};

/// Resolución de las condiciones de facturación de un proyecto
pub trait ProjectLookup {
    fn billing_terms(&self, project_id: Uuid) -> Option<BillingTerms>;
}

impl ProjectLookup for HashMap<Uuid, BillingTerms> {
    fn billing_terms(&self, project_id: Uuid) -> Option<BillingTerms> {
        self.get(&project_id).copied()
    }
}

/// Viaje que puede liquidarse
pub trait BillableTrip {
    fn project_id(&self) -> Uuid;
    fn measurements(&self) -> TripMeasurements;
}

/// Totales de un grupo de viajes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_trips: i64,
    pub total_earnings: Decimal,
    pub total_advance: Decimal,
    pub total_driver_amount: Decimal,
    pub total_fuel_cost: Decimal,
    pub net_earnings: Decimal,
    /// Litros de combustible adelantados
    pub total_fuel_used: Decimal,
    pub total_km: Option<Decimal>,
    pub total_tons: Option<Decimal>,
    pub total_days: Option<Decimal>,
}

impl AddAssign<&ReportSummary> for ReportSummary {
    fn add_assign(&mut self, other: &ReportSummary) {
        self.total_trips += other.total_trips;
        self.total_earnings += other.total_earnings;
        self.total_advance += other.total_advance;
        self.total_driver_amount += other.total_driver_amount;
        self.total_fuel_cost += other.total_fuel_cost;
        self.net_earnings += other.net_earnings;
        self.total_fuel_used += other.total_fuel_used;
        self.total_km = add_optional(self.total_km, other.total_km);
        self.total_tons = add_optional(self.total_tons, other.total_tons);
        self.total_days = add_optional(self.total_days, other.total_days);
    }
}

fn add_optional(left: Option<Decimal>, right: Option<Decimal>) -> Option<Decimal> {
    match (left, right) {
        (None, None) => None,
        (l, r) => Some(l.unwrap_or(Decimal::ZERO) + r.unwrap_or(Decimal::ZERO)),
    }
}

/// Agregador de liquidaciones
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAggregator {
    calculator: SettlementCalculator,
}

impl ReportAggregator {
    pub fn new(calculator: SettlementCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> SettlementCalculator {
        self.calculator
    }

    /// Agregar viajes de cualquier proyecto
    pub fn aggregate<'a, T, I, L>(&self, trips: I, lookup: &L) -> ReportSummary
    where
        T: BillableTrip + 'a,
        I: IntoIterator<Item = &'a T>,
        L: ProjectLookup + ?Sized,
    {
        let mut summary = ReportSummary::default();
        for trip in trips {
            let terms = lookup.billing_terms(trip.project_id());
            self.accumulate(&mut summary, &trip.measurements(), terms.as_ref());
        }
        summary
    }

    /// Agregar los viajes de un único proyecto, sumando además la medición
    /// efectiva de su tipo de facturación.
    pub fn aggregate_project<'a, T, I>(&self, trips: I, terms: Option<&BillingTerms>) -> ReportSummary
    where
        T: BillableTrip + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut summary = ReportSummary::default();
        let mut total_measure = Decimal::ZERO;

        for trip in trips {
            let measurements = trip.measurements();
            if let Some(terms) = terms {
                total_measure += measurements.effective_value(terms.project_type);
            }
            self.accumulate(&mut summary, &measurements, terms);
        }

        if let Some(terms) = terms {
            match terms.project_type {
                ProjectType::Km => summary.total_km = Some(total_measure),
                ProjectType::MetricTon => summary.total_tons = Some(total_measure),
                ProjectType::DayRent => summary.total_days = Some(total_measure),
            }
        }
        summary
    }

    fn accumulate(
        &self,
        summary: &mut ReportSummary,
        measurements: &TripMeasurements,
        terms: Option<&BillingTerms>,
    ) {
        let settlement = self.calculator.compute(measurements, terms);
        summary.total_trips += 1;
        summary.total_earnings += settlement.gross_amount;
        summary.total_advance += settlement.advance_amount;
        summary.total_driver_amount += settlement.driver_amount;
        summary.total_fuel_cost += settlement.fuel_cost;
        summary.net_earnings += settlement.net_earnings;
        summary.total_fuel_used += settlement.fuel_quantity;
    }
}

/// Kilómetros efectivos (reales o planificados) de un conjunto de viajes
pub fn total_distance<'a, T, I>(trips: I) -> Decimal
where
    T: BillableTrip + 'a,
    I: IntoIterator<Item = &'a T>,
{
    trips
        .into_iter()
        .map(|trip| trip.measurements().effective_value(ProjectType::Km))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTrip {
        project_id: Uuid,
        measurements: TripMeasurements,
    }

    impl BillableTrip for FakeTrip {
        fn project_id(&self) -> Uuid {
            self.project_id
        }

        fn measurements(&self) -> TripMeasurements {
            self.measurements.clone()
        }
    }

    fn km_trip(project_id: Uuid, km: i64, actual: Option<i64>, fuel: i64) -> FakeTrip {
        FakeTrip {
            project_id,
            measurements: TripMeasurements {
                km: Some(Decimal::from(km)),
                actual_km: actual.map(Decimal::from),
                fuel_advance: Decimal::from(fuel),
                ..Default::default()
            },
        }
    }

    fn projects(entries: &[(Uuid, ProjectType, i64)]) -> HashMap<Uuid, BillingTerms> {
        entries
            .iter()
            .map(|(id, project_type, rate)| {
                (*id, BillingTerms { project_type: *project_type, rate: Decimal::from(*rate) })
            })
            .collect()
    }

    #[test]
    fn test_aggregate_sums_settlements() {
        let project = Uuid::new_v4();
        let lookup = projects(&[(project, ProjectType::Km, 100)]);
        let trips = vec![km_trip(project, 50, None, 10), km_trip(project, 50, Some(70), 10)];

        let summary = ReportAggregator::default().aggregate(&trips, &lookup);

        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_earnings, Decimal::from(12_000));
        assert_eq!(summary.total_advance, Decimal::from(4_200));
        assert_eq!(summary.net_earnings, Decimal::from(3_800));
        assert_eq!(summary.total_fuel_used, Decimal::from(20));
        assert_eq!(summary.total_km, None);
    }

    #[test]
    fn test_missing_project_contributes_zero() {
        let known = Uuid::new_v4();
        let lookup = projects(&[(known, ProjectType::Km, 100)]);
        let trips = vec![km_trip(known, 50, None, 10), km_trip(Uuid::new_v4(), 500, None, 99)];

        let summary = ReportAggregator::default().aggregate(&trips, &lookup);

        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_earnings, Decimal::from(5_000));
        assert_eq!(summary.net_earnings, Decimal::from(1_450));
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lookup = projects(&[(a, ProjectType::Km, 37), (b, ProjectType::MetricTon, 410)]);
        let mut trips = vec![
            km_trip(a, 13, Some(17), 3),
            FakeTrip {
                project_id: b,
                measurements: TripMeasurements {
                    tons: Some(Decimal::new(75, 1)),
                    fuel_advance: Decimal::from(4),
                    ..Default::default()
                },
            },
            km_trip(a, 90, None, 11),
        ];
        let aggregator = ReportAggregator::default();

        let forward = aggregator.aggregate(&trips, &lookup);
        trips.reverse();
        let backward = aggregator.aggregate(&trips, &lookup);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_project_totals_only_fill_their_type() {
        let project = Uuid::new_v4();
        let terms = BillingTerms { project_type: ProjectType::DayRent, rate: Decimal::from(1000) };
        let trips = vec![
            FakeTrip {
                project_id: project,
                measurements: TripMeasurements { days: Some(2), actual_days: Some(3), ..Default::default() },
            },
            FakeTrip {
                project_id: project,
                measurements: TripMeasurements { days: Some(1), ..Default::default() },
            },
        ];

        let summary = ReportAggregator::default().aggregate_project(&trips, Some(&terms));

        assert_eq!(summary.total_days, Some(Decimal::from(4)));
        assert_eq!(summary.total_km, None);
        assert_eq!(summary.total_tons, None);
        assert_eq!(summary.total_earnings, Decimal::from(4_000));
    }

    #[test]
    fn test_summaries_add_up() {
        let mut total = ReportSummary::default();
        let row = ReportSummary {
            total_trips: 2,
            total_earnings: Decimal::from(10),
            total_km: Some(Decimal::from(5)),
            ..Default::default()
        };
        total += &row;
        total += &row;

        assert_eq!(total.total_trips, 4);
        assert_eq!(total.total_earnings, Decimal::from(20));
        assert_eq!(total.total_km, Some(Decimal::from(10)));
        assert_eq!(total.total_tons, None);
    }

    #[test]
    fn test_total_distance_prefers_actual() {
        let project = Uuid::new_v4();
        let trips = vec![km_trip(project, 50, Some(60), 0), km_trip(project, 40, None, 0)];

        assert_eq!(total_distance(&trips), Decimal::from(100));
    }

    #[test]
    fn test_project_without_terms_settles_to_zero() {
        let project = Uuid::new_v4();
        let trips = vec![km_trip(project, 50, Some(70), 10), km_trip(project, 20, None, 5)];

        let summary = ReportAggregator::default().aggregate_project(&trips, None);

        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_earnings, Decimal::ZERO);
        assert_eq!(summary.total_advance, Decimal::ZERO);
        assert_eq!(summary.total_fuel_cost, Decimal::ZERO);
        assert_eq!(summary.net_earnings, Decimal::ZERO);
        assert_eq!(summary.total_km, None);
        assert_eq!(summary.total_tons, None);
        assert_eq!(summary.total_days, None);
    }

    #[test]
    fn test_zero_rate_project_still_sums_its_measure() {
        let project = Uuid::new_v4();
        let terms = BillingTerms { project_type: ProjectType::Km, rate: Decimal::ZERO };
        let trips = vec![km_trip(project, 50, Some(70), 10), km_trip(project, 20, None, 5)];

        let summary = ReportAggregator::default().aggregate_project(&trips, Some(&terms));

        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_earnings, Decimal::ZERO);
        assert_eq!(summary.total_driver_amount, Decimal::ZERO);
        assert_eq!(summary.net_earnings, Decimal::ZERO);
        assert_eq!(summary.total_km, Some(Decimal::from(90)));
        assert_eq!(summary.total_tons, None);
    }
}
