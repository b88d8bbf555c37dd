use derive_more::Display;
use thiserror::Error;

/// The phase the appliance reports. Disconnection is tracked separately
/// through the connection flag.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    #[default]
    #[display(fmt = "idle")]
    Idle,
    #[display(fmt = "roasting")]
    Roasting,
    #[display(fmt = "cooling")]
    Cooling,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatusError {
    #[error("Unknown device status code {0}")]
    UnknownCode(u8),
}

impl DeviceStatus {
    /// Roasting and cooling advance the timers and accumulate samples.
    pub fn is_active(self) -> bool {
        matches!(self, DeviceStatus::Roasting | DeviceStatus::Cooling)
    }
}

/// Raw status codes as the appliance reports them.
impl TryFrom<u8> for DeviceStatus {
    type Error = DeviceStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DeviceStatus::Idle),
            1 => Ok(DeviceStatus::Roasting),
            2 => Ok(DeviceStatus::Cooling),
            other => Err(DeviceStatusError::UnknownCode(other)),
        }
    }
}

impl From<DeviceStatus> for u8 {
    fn from(value: DeviceStatus) -> Self {
        match value {
            DeviceStatus::Idle => 0,
            DeviceStatus::Roasting => 1,
            DeviceStatus::Cooling => 2,
        }
    }
}
