//! Máquina de estados de viajes
//!
//! Valida los cambios de estado de un viaje y calcula la nueva instantánea
//! (estado, marcas de tiempo, mediciones reales y notas). La persistencia
//! queda en manos del llamador.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::trip::TripStatus;

/// Cambio de estado rechazado por la tabla de transiciones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid status transition from {current} to {requested}")]
pub struct InvalidTransition {
    pub current: TripStatus,
    pub requested: TripStatus,
}

/// Parte mutable del viaje que gobierna la máquina de estados
#[derive(Debug, Clone, PartialEq)]
pub struct TripProgress {
    pub status: TripStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub actual_km: Option<Decimal>,
    pub actual_tons: Option<Decimal>,
    pub actual_days: Option<i32>,
    pub notes: String,
}

/// Petición de cambio de estado.
///
/// En las mediciones reales `None` deja el valor intacto y `Some(None)` lo borra.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub requested: TripStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub actual_km: Option<Option<Decimal>>,
    pub actual_tons: Option<Option<Decimal>>,
    pub actual_days: Option<Option<i32>>,
    pub notes: Option<String>,
}

impl StatusChange {
    pub fn to(requested: TripStatus) -> Self {
        Self {
            requested,
            start_time: None,
            end_time: None,
            actual_km: None,
            actual_tons: None,
            actual_days: None,
            notes: None,
        }
    }
}

/// Estados alcanzables desde `from`
pub fn allowed_transitions(from: TripStatus) -> &'static [TripStatus] {
    match from {
        TripStatus::Upcoming => &[
            TripStatus::OnProcess,
            TripStatus::Completed,
            TripStatus::Cancelled,
        ],
        TripStatus::OnProcess => &[TripStatus::Completed, TripStatus::Cancelled],
        TripStatus::Completed => &[TripStatus::OnProcess],
        TripStatus::Cancelled => &[TripStatus::Upcoming, TripStatus::OnProcess],
    }
}

pub fn can_transition(from: TripStatus, to: TripStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Aplicar un cambio de estado y devolver la nueva instantánea.
///
/// Las marcas de tiempo automáticas usan `now`; las que envía el llamador
/// siempre prevalecen.
pub fn transition(
    current: &TripProgress,
    change: StatusChange,
    now: DateTime<Utc>,
) -> Result<TripProgress, InvalidTransition> {
    if !can_transition(current.status, change.requested) {
        return Err(InvalidTransition {
            current: current.status,
            requested: change.requested,
        });
    }

    let mut next = current.clone();
    next.status = change.requested;

    if current.status == TripStatus::Upcoming
        && change.requested == TripStatus::OnProcess
        && next.start_time.is_none()
    {
        next.start_time = Some(now);
    }

    if change.requested == TripStatus::Completed && next.end_time.is_none() {
        next.end_time = Some(now);
    }

    if let Some(start_time) = change.start_time {
        next.start_time = Some(start_time);
    }
    if let Some(end_time) = change.end_time {
        next.end_time = Some(end_time);
    }
    if let Some(actual_km) = change.actual_km {
        next.actual_km = actual_km;
    }
    if let Some(actual_tons) = change.actual_tons {
        next.actual_tons = actual_tons;
    }
    if let Some(actual_days) = change.actual_days {
        next.actual_days = actual_days;
    }
    if let Some(notes) = change.notes {
        next.notes = notes;
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ALL: [TripStatus; 4] = [
        TripStatus::Upcoming,
        TripStatus::OnProcess,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    fn progress(status: TripStatus) -> TripProgress {
        TripProgress {
            status,
            start_time: None,
            end_time: None,
            actual_km: None,
            actual_tons: None,
            actual_days: None,
            notes: String::new(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_transition_table() {
        let allowed = [
            (TripStatus::Upcoming, TripStatus::OnProcess),
            (TripStatus::Upcoming, TripStatus::Completed),
            (TripStatus::Upcoming, TripStatus::Cancelled),
            (TripStatus::OnProcess, TripStatus::Completed),
            (TripStatus::OnProcess, TripStatus::Cancelled),
            (TripStatus::Completed, TripStatus::OnProcess),
            (TripStatus::Cancelled, TripStatus::Upcoming),
            (TripStatus::Cancelled, TripStatus::OnProcess),
        ];

        for from in ALL {
            for to in ALL {
                let result = transition(&progress(from), StatusChange::to(to), at(10));
                if allowed.contains(&(from, to)) {
                    assert_eq!(result.map(|p| p.status), Ok(to), "{} -> {}", from, to);
                } else {
                    assert_eq!(
                        result,
                        Err(InvalidTransition { current: from, requested: to }),
                        "{} -> {}",
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn test_completed_to_upcoming_is_rejected() {
        let err = transition(
            &progress(TripStatus::Completed),
            StatusChange::to(TripStatus::Upcoming),
            at(10),
        )
        .unwrap_err();

        assert_eq!(err.current, TripStatus::Completed);
        assert_eq!(err.requested, TripStatus::Upcoming);
        assert_eq!(
            err.to_string(),
            "Invalid status transition from Completed to Upcoming"
        );
    }

    #[test]
    fn test_cancelled_to_completed_is_rejected() {
        assert!(transition(
            &progress(TripStatus::Cancelled),
            StatusChange::to(TripStatus::Completed),
            at(10),
        )
        .is_err());
    }

    #[test]
    fn test_start_sets_start_time() {
        let next = transition(
            &progress(TripStatus::Upcoming),
            StatusChange::to(TripStatus::OnProcess),
            at(9),
        )
        .unwrap();

        assert_eq!(next.status, TripStatus::OnProcess);
        assert_eq!(next.start_time, Some(at(9)));
        assert_eq!(next.end_time, None);
    }

    #[test]
    fn test_start_keeps_existing_start_time() {
        let mut current = progress(TripStatus::Upcoming);
        current.start_time = Some(at(6));

        let next = transition(&current, StatusChange::to(TripStatus::OnProcess), at(9)).unwrap();
        assert_eq!(next.start_time, Some(at(6)));
    }

    #[test]
    fn test_resume_from_cancelled_does_not_stamp_start() {
        let next = transition(
            &progress(TripStatus::Cancelled),
            StatusChange::to(TripStatus::OnProcess),
            at(9),
        )
        .unwrap();

        assert_eq!(next.start_time, None);
    }

    #[test]
    fn test_complete_sets_end_time_once() {
        let next = transition(
            &progress(TripStatus::OnProcess),
            StatusChange::to(TripStatus::Completed),
            at(18),
        )
        .unwrap();
        assert_eq!(next.end_time, Some(at(18)));

        let mut current = progress(TripStatus::Upcoming);
        current.end_time = Some(at(12));
        let next = transition(&current, StatusChange::to(TripStatus::Completed), at(18)).unwrap();
        assert_eq!(next.end_time, Some(at(12)));
    }

    #[test]
    fn test_supplied_timestamps_win() {
        let change = StatusChange {
            start_time: Some(at(7)),
            end_time: Some(at(8)),
            ..StatusChange::to(TripStatus::Completed)
        };
        let next = transition(&progress(TripStatus::Upcoming), change, at(20)).unwrap();

        assert_eq!(next.start_time, Some(at(7)));
        assert_eq!(next.end_time, Some(at(8)));
    }

    #[test]
    fn test_actuals_and_notes_are_independent() {
        let mut current = progress(TripStatus::OnProcess);
        current.actual_km = Some(Decimal::from(120));
        current.actual_tons = Some(Decimal::from(3));
        current.notes = "loaded".to_string();

        let change = StatusChange {
            actual_km: Some(Some(Decimal::from(130))),
            actual_tons: Some(None),
            notes: Some("delivered".to_string()),
            ..StatusChange::to(TripStatus::Completed)
        };
        let next = transition(&current, change, at(18)).unwrap();

        assert_eq!(next.actual_km, Some(Decimal::from(130)));
        assert_eq!(next.actual_tons, None);
        assert_eq!(next.actual_days, None);
        assert_eq!(next.notes, "delivered");
    }

    #[test]
    fn test_every_state_has_an_exit() {
        for status in ALL {
            assert!(!allowed_transitions(status).is_empty());
        }
    }
}
