use crate::errors::{Error, Result};
use crate::model::Reading;

const SYSTOLIC_MIN: i64 = 50;
const SYSTOLIC_MAX: i64 = 300;
const DIASTOLIC_MIN: i64 = 20;
const DIASTOLIC_MAX: i64 = 200;
const PULSE_MIN: i64 = 20;
const PULSE_MAX: i64 = 250;

/// Sanity-checks a reading before it is persisted. Runs on the fully-built
/// record, so creates and merged updates go through the same checks.
pub fn validate(reading: &Reading) -> Result<()> {
    if reading.systolic < SYSTOLIC_MIN || reading.systolic > SYSTOLIC_MAX {
        return Err(Error::Validation(format!(
            "Systolic {} out of range [{}, {}]",
            reading.systolic, SYSTOLIC_MIN, SYSTOLIC_MAX
        )));
    }

    if reading.diastolic < DIASTOLIC_MIN || reading.diastolic > DIASTOLIC_MAX {
        return Err(Error::Validation(format!(
            "Diastolic {} out of range [{}, {}]",
            reading.diastolic, DIASTOLIC_MIN, DIASTOLIC_MAX
        )));
    }

    if reading.pulse < PULSE_MIN || reading.pulse > PULSE_MAX {
        return Err(Error::Validation(format!(
            "Pulse {} out of range [{}, {}]",
            reading.pulse, PULSE_MIN, PULSE_MAX
        )));
    }

    if reading.timestamp.is_empty() {
        return Err(Error::Validation("Timestamp cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> Reading {
        Reading {
            id: "r1".to_string(),
            timestamp: "2024-01-01T08:00".to_string(),
            systolic: 120,
            diastolic: 80,
            pulse: 70,
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_reading() {
        assert!(validate(&reading()).is_ok());
    }

    #[test]
    fn test_invalid_systolic() {
        let mut r = reading();
        r.systolic = 500; // Out of range
        assert!(validate(&r).is_err());
    }

    #[test]
    fn test_invalid_diastolic() {
        let mut r = reading();
        r.diastolic = 10; // Out of range
        assert!(validate(&r).is_err());
    }

    #[test]
    fn test_invalid_pulse() {
        let mut r = reading();
        r.pulse = 5; // Out of range
        assert!(validate(&r).is_err());
    }

    #[test]
    fn test_empty_timestamp() {
        let mut r = reading();
        r.timestamp = String::new();
        assert!(validate(&r).is_err());
    }
}
