pub mod device_status;
pub mod elapsed;
pub mod guarded_value;
pub mod sample;
pub mod setpoint;
pub mod telemetry_snapshot;
pub mod temperature;
