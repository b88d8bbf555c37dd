use std::fmt::Display;

use thiserror::Error;

/// Lowest reading the bean probe is trusted to report, in degF.
pub const MIN_READING_FAHRENHEIT: f32 = -100f32;

/// Highest reading the bean probe is trusted to report, in degF.
pub const MAX_READING_FAHRENHEIT: f32 = 1000f32;

/// A bean temperature reading in degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature {
    pub value: f32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemperatureError {
    #[error("Temperature is not a finite number")]
    NotFinite,

    #[error("Temperature {0} degF outside of the probe range")]
    OutOfRange(f32),
}

impl TryFrom<f32> for Temperature {
    type Error = TemperatureError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(TemperatureError::NotFinite);
        }
        if !(MIN_READING_FAHRENHEIT..=MAX_READING_FAHRENHEIT).contains(&value) {
            return Err(TemperatureError::OutOfRange(value));
        }
        Ok(Temperature { value })
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} degF)", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_readings_in_probe_range() {
        let t = Temperature::try_from(385.5f32).expect("Failed to get temperature");
        assert_eq!(t.value, 385.5f32);
        assert!(Temperature::try_from(MIN_READING_FAHRENHEIT).is_ok());
        assert!(Temperature::try_from(MAX_READING_FAHRENHEIT).is_ok());
    }

    #[test]
    fn test_rejects_bad_readings() {
        assert_eq!(
            Temperature::try_from(f32::NAN),
            Err(TemperatureError::NotFinite)
        );
        assert_eq!(
            Temperature::try_from(f32::INFINITY),
            Err(TemperatureError::NotFinite)
        );
        assert_eq!(
            Temperature::try_from(1200f32),
            Err(TemperatureError::OutOfRange(1200f32))
        );
    }
}
