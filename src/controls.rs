use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    externals::roaster::services::{RoasterService, RoasterServiceError},
    models::{
        guarded_value::GuardedValue,
        setpoint::{FanSpeed, SectionTime, TargetTemperature},
    },
};

/// Displayed values of the two sliders the operator can drag. Shared between
/// the gesture handlers and the telemetry poller.
#[derive(Debug, Default)]
pub struct Controls {
    pub target_temperature: GuardedValue<TargetTemperature>,
    pub section_time: GuardedValue<SectionTime>,
}

/// Gesture handlers of the control panel. Every handler runs on the caller's
/// thread and sends its command to the roaster before returning.
pub struct ControlPanel {
    roaster: Arc<dyn RoasterService>,
    controls: Arc<Controls>,
}

impl ControlPanel {
    pub fn new(roaster: Arc<dyn RoasterService>, controls: Arc<Controls>) -> Self {
        Self { roaster, controls }
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// The operator grabbed the target temperature slider.
    pub fn press_target_temperature(&self) {
        debug!("Target temperature slider pressed.");
        self.controls.target_temperature.hold();
    }

    /// The target temperature slider moved to `raw` degF. Out of range
    /// positions are clamped.
    pub fn move_target_temperature(
        &self,
        raw: u16,
    ) -> Result<TargetTemperature, RoasterServiceError> {
        let target = TargetTemperature::clamped(raw);
        self.controls.target_temperature.set(target);
        issue(
            "set target temperature",
            self.roaster.set_target_temperature(target),
        )?;
        Ok(target)
    }

    pub fn release_target_temperature(&self) {
        debug!("Target temperature slider released.");
        self.controls.target_temperature.release();
    }

    /// The operator grabbed the section time slider.
    pub fn press_section_time(&self) {
        debug!("Section time slider pressed.");
        self.controls.section_time.hold();
    }

    /// The section time slider moved to `raw` seconds. Out of range
    /// positions are clamped.
    pub fn move_section_time(&self, raw: u32) -> Result<SectionTime, RoasterServiceError> {
        let time = SectionTime::clamped(raw);
        self.controls.section_time.set(time);
        issue("set section time", self.roaster.set_section_time(time))?;
        Ok(time)
    }

    pub fn release_section_time(&self) {
        debug!("Section time slider released.");
        self.controls.section_time.release();
    }

    pub fn change_fan_speed(&self, raw: u8) -> Result<FanSpeed, RoasterServiceError> {
        let speed = FanSpeed::clamped(raw);
        issue("set fan speed", self.roaster.set_fan_speed(speed))?;
        Ok(speed)
    }

    pub fn start_roast(&self) -> Result<(), RoasterServiceError> {
        info!("Starting roast.");
        issue("start roast", self.roaster.start_roast())
    }

    pub fn stop(&self) -> Result<(), RoasterServiceError> {
        info!("Returning roaster to idle.");
        issue("return to idle", self.roaster.return_to_idle())
    }

    pub fn cool(&self) -> Result<(), RoasterServiceError> {
        info!("Starting cooling phase.");
        issue("start cooling", self.roaster.start_cooling())
    }
}

fn issue(
    command: &str,
    result: Result<(), RoasterServiceError>,
) -> Result<(), RoasterServiceError> {
    match result {
        Err(e) => {
            error!("Failed to {}. Error: {}", command, e);
            Err(e)
        }
        Ok(_) => {
            debug!("Sent {} to roaster.", command);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        externals::roaster::simulated::SimulatedRoaster, models::device_status::DeviceStatus,
    };

    use super::*;

    fn panel() -> (Arc<SimulatedRoaster>, ControlPanel) {
        let roaster = Arc::new(SimulatedRoaster::new());
        roaster.set_connected(true);
        let panel = ControlPanel::new(roaster.clone(), Arc::new(Controls::default()));
        (roaster, panel)
    }

    #[test]
    fn test_drag_holds_control_and_sends_commands() {
        let (roaster, panel) = panel();

        panel.press_target_temperature();
        assert!(panel.controls().target_temperature.is_held());

        let target = panel
            .move_target_temperature(450)
            .expect("Failed to move slider");
        assert_eq!(target.value(), 450);
        assert_eq!(panel.controls().target_temperature.get(), target);
        assert_eq!(roaster.target_temperature(), Ok(target));

        panel.release_target_temperature();
        assert!(!panel.controls().target_temperature.is_held());
    }

    #[test]
    fn test_slider_positions_are_clamped() {
        let (roaster, panel) = panel();

        assert_eq!(
            panel.move_target_temperature(1000).map(|t| t.value()),
            Ok(600)
        );
        assert_eq!(panel.move_section_time(9000).map(|t| t.seconds()), Ok(720));
        assert_eq!(roaster.section_time().seconds(), 720);
        assert_eq!(panel.change_fan_speed(0).map(|s| s.value()), Ok(1));
        assert_eq!(roaster.fan_speed().value(), 1);
    }

    #[test]
    fn test_section_time_drag() {
        let (_roaster, panel) = panel();

        panel.press_section_time();
        assert!(panel.controls().section_time.is_held());
        panel.move_section_time(240).expect("Failed to move slider");
        assert!(!panel.controls().section_time.try_set(SectionTime::clamped(10)));
        assert_eq!(panel.controls().section_time.get().seconds(), 240);

        panel.release_section_time();
        assert!(!panel.controls().section_time.is_held());
    }

    #[test]
    fn test_phase_buttons() {
        let (roaster, panel) = panel();

        panel.start_roast().expect("Failed to start roast");
        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Roasting));
        panel.cool().expect("Failed to cool");
        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Cooling));
        panel.stop().expect("Failed to stop");
        assert_eq!(roaster.current_status(), Ok(DeviceStatus::Idle));
    }

    #[test]
    fn test_commands_fail_while_disconnected() {
        let (roaster, panel) = panel();
        roaster.set_connected(false);

        assert_eq!(panel.start_roast(), Err(RoasterServiceError::Disconnected));
        assert_eq!(
            panel.change_fan_speed(3),
            Err(RoasterServiceError::Disconnected)
        );
    }
}
