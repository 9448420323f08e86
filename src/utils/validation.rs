//! Utilidades de validación
//!
//! Validadores personalizados para los DTOs (`#[validate(custom = "...")]`)
//! y helpers de comprobación usados por los controladores.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::models::{
    admin::LICENSE_TYPES,
    driver::{DRIVER_STATUSES, DRIVER_VEHICLE_TYPES},
    project::PROJECT_STATUSES,
    vehicle::{FUEL_TYPES, TRANSMISSIONS, VEHICLE_STATUSES, VEHICLE_TYPES},
};

lazy_static! {
    static ref MOBILE_REGEX: Regex = Regex::new(r"^\+?[0-9]{10,15}$").unwrap();
    static ref REGISTRATION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9 -]{4,20}$").unwrap();
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        let mut error = ValidationError::new(code);
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &allowed);
        return Err(error);
    }
    Ok(())
}

pub fn validate_driver_status(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, DRIVER_STATUSES, "driver_status")
}

pub fn validate_driver_vehicle_type(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, DRIVER_VEHICLE_TYPES, "vehicle_type")
}

pub fn validate_vehicle_type(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, VEHICLE_TYPES, "vehicle_type")
}

pub fn validate_fuel_type(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, FUEL_TYPES, "fuel_type")
}

pub fn validate_transmission(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, TRANSMISSIONS, "transmission")
}

pub fn validate_vehicle_status(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, VEHICLE_STATUSES, "vehicle_status")
}

pub fn validate_project_status(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, PROJECT_STATUSES, "project_status")
}

pub fn validate_license_type(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, LICENSE_TYPES, "license_type")
}

/// Validar formato de móvil: 10 a 15 dígitos con prefijo `+` opcional
pub fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if !MOBILE_REGEX.is_match(&compact) {
        let mut error = ValidationError::new("mobile");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    if !REGISTRATION_REGEX.is_match(value.trim()) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T>(value: &T) -> Result<(), ValidationError>
where
    T: PartialOrd + num_traits::Zero + Serialize,
{
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(value)
}

/// El derive de `validator` pasa los enteros por valor
pub fn validate_non_negative_days(value: i32) -> Result<(), ValidationError> {
    validate_non_negative(&value)
}

/// Validar que la fecha final no sea anterior a la inicial
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        let mut error = ValidationError::new("date_range");
        error.add_param("start_date".into(), &start);
        error.add_param("end_date".into(), &end);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_one_of() {
        assert!(validate_vehicle_type("Truck").is_ok());
        assert!(validate_vehicle_type("Spaceship").is_err());
        assert!(validate_driver_status("On Leave").is_ok());
        assert!(validate_project_status("On Hold").is_ok());
        assert!(validate_project_status("on hold").is_err());
        assert!(validate_license_type("Premium").is_ok());
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+91 98765-43210").is_ok());
        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("98765abcde").is_err());
    }

    #[test]
    fn test_validate_registration_number() {
        assert!(validate_registration_number("MH12AB1234").is_ok());
        assert!(validate_registration_number("MH 12 AB 1234").is_ok());
        assert!(validate_registration_number("A!").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(-1, 1)).is_err());
        assert!(validate_non_negative_days(3).is_ok());
        assert!(validate_non_negative_days(-3).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert!(validate_date_range(start, start).is_ok());
        assert!(validate_date_range(start, end).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Pune").is_ok());
    }
}
