use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tracing::{debug, trace};

use crate::models::{
    device_status::DeviceStatus,
    setpoint::{FanSpeed, SectionTime, TargetTemperature},
    temperature::Temperature,
};

use super::services::{RoasterService, RoasterServiceError};

const AMBIENT_FAHRENHEIT: f32 = 70f32;
const HEATING_RATE_PER_SECOND: f32 = 12f32;
const COOLING_RATE_PER_SECOND: f32 = 8f32;

#[derive(Debug, Clone)]
struct SimulatedState {
    connected: bool,
    status: DeviceStatus,
    temperature: f32,
    target: TargetTemperature,
    fan_speed: FanSpeed,
    section_time: SectionTime,
    section_elapsed: u32,
    total_elapsed: u32,
    /// Simulated time below one second not yet counted on the clocks.
    clock_carry: Duration,
    failing_reads: u32,
}

/// In-process stand-in for the roaster. Holds the appliance state behind a
/// mutex and moves the bean temperature toward its target when advanced.
pub struct SimulatedRoaster {
    state: Mutex<SimulatedState>,
}

impl Default for SimulatedRoaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRoaster {
    /// Starts disconnected and idle at ambient temperature.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimulatedState {
                connected: false,
                status: DeviceStatus::Idle,
                temperature: AMBIENT_FAHRENHEIT,
                target: TargetTemperature::default(),
                fan_speed: FanSpeed::default(),
                section_time: SectionTime::default(),
                section_elapsed: 0,
                total_elapsed: 0,
                clock_carry: Duration::ZERO,
                failing_reads: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plug the appliance in or pull it out.
    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    pub fn set_status(&self, status: DeviceStatus) {
        self.lock().status = status;
    }

    /// Force the raw probe reading. Values the model rejects surface as read
    /// errors.
    pub fn set_temperature(&self, degf: f32) {
        self.lock().temperature = degf;
    }

    pub fn set_elapsed(&self, section_seconds: u32, total_seconds: u32) {
        let mut s = self.lock();
        s.section_elapsed = section_seconds;
        s.total_elapsed = total_seconds;
    }

    /// Make the next `count` reads fail as if the appliance did not answer.
    pub fn fail_reads(&self, count: u32) {
        self.lock().failing_reads = count;
    }

    pub fn fan_speed(&self) -> FanSpeed {
        self.lock().fan_speed
    }

    pub fn section_time(&self) -> SectionTime {
        self.lock().section_time
    }

    /// Advance the simulation by `dt`. Only an attached roaster in an active
    /// phase moves its clocks, which count whole seconds and keep the rest
    /// for the next step.
    pub fn advance(&self, dt: Duration) {
        let mut s = self.lock();
        if !s.connected || !s.status.is_active() {
            return;
        }

        let pending = s.clock_carry + dt;
        let whole = pending.as_secs();
        s.clock_carry = pending - Duration::from_secs(whole);
        let whole = u32::try_from(whole).unwrap_or(u32::MAX);
        s.section_elapsed = s.section_elapsed.saturating_add(whole);
        s.total_elapsed = s.total_elapsed.saturating_add(whole);

        let dt = dt.as_secs_f32();
        match s.status {
            DeviceStatus::Roasting => {
                // More air carries heat away from the beans.
                let fan_loss = s.fan_speed.value() as f32 / 9f32;
                let step = HEATING_RATE_PER_SECOND * (1.5f32 - fan_loss) * dt;
                let target = s.target.value() as f32;
                s.temperature = if s.temperature < target {
                    (s.temperature + step).min(target)
                } else {
                    (s.temperature - step).max(target)
                };

                let section = s.section_time.seconds();
                if section > 0 && s.section_elapsed >= section {
                    debug!("Roast section finished, switching to cooling.");
                    s.status = DeviceStatus::Cooling;
                    s.section_elapsed = 0;
                }
            }
            DeviceStatus::Cooling => {
                let step = COOLING_RATE_PER_SECOND * dt;
                s.temperature = (s.temperature - step).max(AMBIENT_FAHRENHEIT);
            }
            DeviceStatus::Idle => {}
        }
        trace!(
            "Simulated roaster at {} degF after {}s.",
            s.temperature,
            s.total_elapsed
        );
    }

    /// Shared guard for every read: consumes an injected failure first, then
    /// requires the appliance to be attached.
    fn read<T>(
        &self,
        f: impl FnOnce(&SimulatedState) -> Result<T, RoasterServiceError>,
    ) -> Result<T, RoasterServiceError> {
        let mut s = self.lock();
        if s.failing_reads > 0 {
            s.failing_reads -= 1;
            return Err(RoasterServiceError::ReadFailed(
                "simulated read timeout".into(),
            ));
        }
        if !s.connected {
            return Err(RoasterServiceError::Disconnected);
        }
        f(&*s)
    }

    fn command(&self, f: impl FnOnce(&mut SimulatedState)) -> Result<(), RoasterServiceError> {
        let mut s = self.lock();
        if !s.connected {
            return Err(RoasterServiceError::Disconnected);
        }
        f(&mut *s);
        Ok(())
    }
}

impl RoasterService for SimulatedRoaster {
    fn current_temperature(&self) -> Result<Temperature, RoasterServiceError> {
        self.read(|s| Ok(Temperature::try_from(s.temperature)?))
    }

    fn target_temperature(&self) -> Result<TargetTemperature, RoasterServiceError> {
        self.read(|s| Ok(s.target))
    }

    fn current_status(&self) -> Result<DeviceStatus, RoasterServiceError> {
        self.read(|s| Ok(s.status))
    }

    fn is_connected(&self) -> Result<bool, RoasterServiceError> {
        let mut s = self.lock();
        if s.failing_reads > 0 {
            s.failing_reads -= 1;
            return Err(RoasterServiceError::ReadFailed(
                "simulated read timeout".into(),
            ));
        }
        Ok(s.connected)
    }

    fn section_elapsed_seconds(&self) -> Result<u32, RoasterServiceError> {
        self.read(|s| Ok(s.section_elapsed))
    }

    fn total_elapsed_seconds(&self) -> Result<u32, RoasterServiceError> {
        self.read(|s| Ok(s.total_elapsed))
    }

    fn set_target_temperature(&self, target: TargetTemperature) -> Result<(), RoasterServiceError> {
        self.command(|s| s.target = target)
    }

    fn set_fan_speed(&self, speed: FanSpeed) -> Result<(), RoasterServiceError> {
        self.command(|s| s.fan_speed = speed)
    }

    fn set_section_time(&self, time: SectionTime) -> Result<(), RoasterServiceError> {
        self.command(|s| s.section_time = time)
    }

    fn start_roast(&self) -> Result<(), RoasterServiceError> {
        self.command(|s| {
            if s.status == DeviceStatus::Idle {
                s.total_elapsed = 0;
                s.clock_carry = Duration::ZERO;
            }
            s.section_elapsed = 0;
            s.status = DeviceStatus::Roasting;
        })
    }

    fn return_to_idle(&self) -> Result<(), RoasterServiceError> {
        self.command(|s| s.status = DeviceStatus::Idle)
    }

    fn start_cooling(&self) -> Result<(), RoasterServiceError> {
        self.command(|s| {
            s.section_elapsed = 0;
            s.status = DeviceStatus::Cooling;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_roaster() -> SimulatedRoaster {
        let roaster = SimulatedRoaster::new();
        roaster.set_connected(true);
        roaster
    }

    #[test]
    fn test_reads_fail_while_disconnected() {
        let roaster = SimulatedRoaster::new();
        assert_eq!(roaster.is_connected(), Ok(false));
        assert_eq!(
            roaster.current_status(),
            Err(RoasterServiceError::Disconnected)
        );
        assert_eq!(roaster.start_roast(), Err(RoasterServiceError::Disconnected));
    }

    #[test]
    fn test_injected_failures_are_consumed() {
        let roaster = connected_roaster();
        roaster.fail_reads(2);

        assert!(matches!(
            roaster.current_temperature(),
            Err(RoasterServiceError::ReadFailed(_))
        ));
        assert!(matches!(
            roaster.is_connected(),
            Err(RoasterServiceError::ReadFailed(_))
        ));
        assert_eq!(roaster.is_connected(), Ok(true));
    }

    #[test]
    fn test_invalid_probe_reading_is_a_read_error() {
        let roaster = connected_roaster();
        roaster.set_temperature(f32::NAN);
        assert!(matches!(
            roaster.current_temperature(),
            Err(RoasterServiceError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_roasting_heats_and_advances_clocks() {
        let roaster = connected_roaster();
        roaster
            .set_target_temperature(TargetTemperature::clamped(400))
            .expect("Failed to set target");
        roaster.start_roast().expect("Failed to start roast");

        roaster.advance(Duration::from_secs(5));

        let temperature = roaster
            .current_temperature()
            .expect("Failed to read temperature");
        assert!(temperature.value > AMBIENT_FAHRENHEIT);
        assert!(temperature.value <= 400f32);
        assert_eq!(roaster.section_elapsed_seconds(), Ok(5));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(5));
    }

    #[test]
    fn test_idle_roaster_does_not_advance() {
        let roaster = connected_roaster();
        roaster.advance(Duration::from_secs(30));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(0));
        assert_eq!(
            roaster.current_temperature().map(|t| t.value),
            Ok(AMBIENT_FAHRENHEIT)
        );
    }

    #[test]
    fn test_section_end_switches_to_cooling() {
        let roaster = connected_roaster();
        roaster
            .set_section_time(SectionTime::clamped(10))
            .expect("Failed to set section time");
        roaster.start_roast().expect("Failed to start roast");

        roaster.advance(Duration::from_secs(10));

        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Cooling));
        assert_eq!(roaster.section_elapsed_seconds(), Ok(0));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(10));
    }

    #[test]
    fn test_sub_second_steps_add_up() {
        let roaster = connected_roaster();
        roaster
            .set_target_temperature(TargetTemperature::clamped(400))
            .expect("Failed to set target");
        roaster.start_roast().expect("Failed to start roast");

        for _ in 0..3 {
            roaster.advance(Duration::from_millis(250));
        }
        assert_eq!(roaster.total_elapsed_seconds(), Ok(0));
        let warmed = roaster
            .current_temperature()
            .expect("Failed to read temperature");
        assert!(warmed.value > AMBIENT_FAHRENHEIT);

        roaster.advance(Duration::from_millis(250));
        assert_eq!(roaster.section_elapsed_seconds(), Ok(1));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(1));

        roaster.advance(Duration::from_millis(1500));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(2));
        roaster.advance(Duration::from_millis(500));
        assert_eq!(roaster.total_elapsed_seconds(), Ok(3));
    }

    #[test]
    fn test_commands_update_state() {
        let roaster = connected_roaster();
        roaster
            .set_fan_speed(FanSpeed::clamped(5))
            .expect("Failed to set fan speed");
        roaster.start_roast().expect("Failed to start roast");
        roaster.start_cooling().expect("Failed to start cooling");
        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Cooling));
        roaster.return_to_idle().expect("Failed to return to idle");
        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Idle));
        assert_eq!(roaster.fan_speed(), FanSpeed::clamped(5));
    }
}
