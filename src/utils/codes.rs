//! Generación de códigos legibles
//!
//! Los vehículos, conductores, proyectos y administradores reciben un código
//! secuencial con prefijo (`VEH001`, `PRJ01`...). Los viajes usan
//! `TRP` + los 8 últimos dígitos del timestamp en milisegundos + 3 dígitos
//! aleatorios.

use rand::Rng;

pub const ADMIN_PREFIX: &str = "ADM";
pub const DRIVER_PREFIX: &str = "DRV";
pub const VEHICLE_PREFIX: &str = "VEH";
pub const PROJECT_PREFIX: &str = "PRJ";
pub const TRIP_PREFIX: &str = "TRP";

/// Código secuencial con relleno de ceros
pub fn sequential_code(prefix: &str, number: i64, width: usize) -> String {
    format!("{}{:0width$}", prefix, number, width = width)
}

/// Código de viaje a partir de un timestamp en milisegundos
pub fn trip_code_at(timestamp_millis: i64, suffix: u16) -> String {
    let digits = timestamp_millis.rem_euclid(100_000_000);
    format!("{}{:08}{:03}", TRIP_PREFIX, digits, suffix % 1000)
}

pub fn trip_code() -> String {
    let suffix = rand::thread_rng().gen_range(0..1000);
    trip_code_at(chrono::Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_code() {
        assert_eq!(sequential_code(VEHICLE_PREFIX, 7, 3), "VEH007");
        assert_eq!(sequential_code(PROJECT_PREFIX, 12, 2), "PRJ12");
        assert_eq!(sequential_code(DRIVER_PREFIX, 1234, 3), "DRV1234");
    }

    #[test]
    fn test_trip_code_layout() {
        assert_eq!(trip_code_at(1_712_345_678_901, 7), "TRP45678901007");
        assert_eq!(trip_code_at(5, 999), "TRP00000005999");

        let code = trip_code();
        assert_eq!(code.len(), 14);
        assert!(code.starts_with("TRP"));
        assert!(code[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
