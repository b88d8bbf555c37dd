use std::{fmt::Display, sync::Arc};

use super::{
    device_status::DeviceStatus,
    elapsed::Elapsed,
    sample::Sample,
    setpoint::{SectionTime, TargetTemperature},
    temperature::Temperature,
};

/// Everything a renderer needs for one frame. Published by the telemetry
/// poller after every completed tick.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub connected: bool,
    pub status: DeviceStatus,
    pub current_temperature: Option<Temperature>,
    pub section_elapsed: Elapsed,
    pub total_elapsed: Elapsed,
    /// Displayed value of the target temperature slider.
    pub target_temperature: TargetTemperature,
    /// Displayed value of the section time slider.
    pub section_time: SectionTime,
    pub samples: Arc<Vec<Sample>>,
}

impl TelemetrySnapshot {
    pub fn controls_enabled(&self) -> bool {
        self.connected
    }

    /// The "please connect your roaster" notice.
    pub fn notice_visible(&self) -> bool {
        !self.connected
    }
}

impl Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.connected {
            return write!(f, "<Telemetry | disconnected>");
        }
        write!(
            f,
            "<Telemetry | status:{}, temperature:{}, target:{}, section:{}, total:{}, samples:{}>",
            self.status,
            self.current_temperature
                .map(|t| t.to_string())
                .unwrap_or_else(|| "--".into()),
            self.target_temperature,
            self.section_elapsed,
            self.total_elapsed,
            self.samples.len()
        )
    }
}
