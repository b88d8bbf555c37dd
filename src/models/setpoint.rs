use derive_more::Display;
use thiserror::Error;

use crate::config::{FAN_SPEED_RANGE, SECTION_TIME_RANGE, TARGET_TEMPERATURE_RANGE};

use super::elapsed::format_elapsed;

/// Temperature the roaster should hold, in whole degF.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[display(fmt = "{}", _0)]
pub struct TargetTemperature(u16);

/// Length of the current roast section, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SectionTime(u32);

/// Fan speed step as the appliance exposes it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[display(fmt = "{}", _0)]
pub struct FanSpeed(u8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetpointError {
    #[error("Target temperature {0} degF outside of the adjustable range")]
    TargetTemperatureOutOfRange(u16),

    #[error("Section time {0}s outside of the adjustable range")]
    SectionTimeOutOfRange(u32),

    #[error("Fan speed {0} outside of the adjustable range")]
    FanSpeedOutOfRange(u8),
}

impl TargetTemperature {
    /// Clamp a raw slider position into the adjustable range.
    pub fn clamped(raw: u16) -> Self {
        Self(raw.clamp(*TARGET_TEMPERATURE_RANGE.start(), *TARGET_TEMPERATURE_RANGE.end()))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl Default for TargetTemperature {
    fn default() -> Self {
        Self(*TARGET_TEMPERATURE_RANGE.start())
    }
}

impl TryFrom<u16> for TargetTemperature {
    type Error = SetpointError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if !TARGET_TEMPERATURE_RANGE.contains(&value) {
            return Err(SetpointError::TargetTemperatureOutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl SectionTime {
    /// Clamp a raw slider position into the adjustable range.
    pub fn clamped(raw: u32) -> Self {
        Self(raw.clamp(*SECTION_TIME_RANGE.start(), *SECTION_TIME_RANGE.end()))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SectionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_elapsed(self.0))
    }
}

impl Default for SectionTime {
    fn default() -> Self {
        Self(*SECTION_TIME_RANGE.start())
    }
}

impl TryFrom<u32> for SectionTime {
    type Error = SetpointError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if !SECTION_TIME_RANGE.contains(&value) {
            return Err(SetpointError::SectionTimeOutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl FanSpeed {
    pub fn clamped(raw: u8) -> Self {
        Self(raw.clamp(*FAN_SPEED_RANGE.start(), *FAN_SPEED_RANGE.end()))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for FanSpeed {
    fn default() -> Self {
        Self(*FAN_SPEED_RANGE.start())
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = SetpointError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if !FAN_SPEED_RANGE.contains(&value) {
            return Err(SetpointError::FanSpeedOutOfRange(value));
        }
        Ok(Self(value))
    }
}
