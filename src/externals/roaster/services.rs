use thiserror::Error;

use crate::models::{
    device_status::{DeviceStatus, DeviceStatusError},
    setpoint::{FanSpeed, SectionTime, TargetTemperature},
    temperature::{Temperature, TemperatureError},
};

/// This service separates talking to the roaster from the control panel
/// logic, which keeps the poller and the gesture handlers testable without
/// an appliance attached.
///
/// Implementations are shared between the UI side and the telemetry poller,
/// so they synchronize internally.
pub trait RoasterService: Send + Sync {
    /// Current bean temperature.
    fn current_temperature(&self) -> Result<Temperature, RoasterServiceError>;

    /// Target temperature the roaster is currently holding.
    fn target_temperature(&self) -> Result<TargetTemperature, RoasterServiceError>;

    fn current_status(&self) -> Result<DeviceStatus, RoasterServiceError>;

    /// Whether the appliance is attached. Disconnection is a normal state,
    /// only a failure to find out is an error.
    fn is_connected(&self) -> Result<bool, RoasterServiceError>;

    fn section_elapsed_seconds(&self) -> Result<u32, RoasterServiceError>;

    fn total_elapsed_seconds(&self) -> Result<u32, RoasterServiceError>;

    fn set_target_temperature(&self, target: TargetTemperature) -> Result<(), RoasterServiceError>;

    fn set_fan_speed(&self, speed: FanSpeed) -> Result<(), RoasterServiceError>;

    fn set_section_time(&self, time: SectionTime) -> Result<(), RoasterServiceError>;

    fn start_roast(&self) -> Result<(), RoasterServiceError>;

    fn return_to_idle(&self) -> Result<(), RoasterServiceError>;

    fn start_cooling(&self) -> Result<(), RoasterServiceError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoasterServiceError {
    /// A read or command needed the appliance but it is not attached.
    #[error("Roaster is not connected.")]
    Disconnected,

    /// The appliance did not answer a read.
    #[error("Failed to read from roaster: {0}")]
    ReadFailed(String),

    /// The appliance reported a temperature the model can't represent.
    #[error("Roaster reported an invalid temperature.")]
    InvalidTemperature(#[from] TemperatureError),

    /// The appliance reported a status code the model doesn't know.
    #[error("Roaster reported an invalid status.")]
    InvalidStatus(#[from] DeviceStatusError),

    /// The appliance refused a command.
    #[error("Roaster rejected command: {0}")]
    CommandRejected(String),
}
