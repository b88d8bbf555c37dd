use std::sync::Arc;

use tokio::{sync::watch, time::Instant};
use tracing::{debug, info, trace, warn};

use crate::{
    controls::Controls,
    externals::roaster::services::{RoasterService, RoasterServiceError},
    models::{
        device_status::DeviceStatus,
        elapsed::Elapsed,
        sample::{Sample, SampleBuffer},
        setpoint::{SectionTime, TargetTemperature},
        telemetry_snapshot::TelemetrySnapshot,
        temperature::Temperature,
    },
};

/// Everything read from the roaster in one tick, gathered before any state
/// is touched.
#[derive(Debug, Clone, Copy)]
enum Observation {
    Disconnected,
    Connected(DeviceReading),
}

#[derive(Debug, Clone, Copy)]
struct DeviceReading {
    status: DeviceStatus,
    temperature: Temperature,
    target_temperature: TargetTemperature,
    /// Section and total elapsed seconds, only read in an active phase.
    elapsed: Option<(u32, u32)>,
}

/// Slider write counters taken before the roaster is read.
#[derive(Debug, Clone, Copy)]
struct ControlEpochs {
    target_temperature: u64,
    section_time: u64,
}

/// Keeps the control panel in sync with the roaster.
///
/// Each [`TelemetryController::tick`] reads the roaster once, records a
/// sample while a roast is active, refreshes the timers and any slider the
/// operator isn't holding, then publishes a [`TelemetrySnapshot`].
pub struct TelemetryController {
    roaster: Arc<dyn RoasterService>,
    controls: Arc<Controls>,
    samples: SampleBuffer,
    session_origin: Option<Instant>,
    last_status: Option<DeviceStatus>,
    snapshot: TelemetrySnapshot,
    tx_snapshot: watch::Sender<TelemetrySnapshot>,
}

impl TelemetryController {
    pub fn new(roaster: Arc<dyn RoasterService>, controls: Arc<Controls>) -> Self {
        let snapshot = TelemetrySnapshot {
            target_temperature: controls.target_temperature.get(),
            section_time: controls.section_time.get(),
            ..Default::default()
        };
        let (tx_snapshot, _) = watch::channel(snapshot.clone());
        Self {
            roaster,
            controls,
            samples: SampleBuffer::new(),
            session_origin: None,
            last_status: None,
            snapshot,
            tx_snapshot,
        }
    }

    /// Receiver of the snapshot published after every completed tick.
    pub fn subscribe(&self) -> watch::Receiver<TelemetrySnapshot> {
        self.tx_snapshot.subscribe()
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    /// Drop the plotted samples and restart the session clock at the next
    /// active tick. This is the only way the plot is cleared.
    pub fn reset_session(&mut self) {
        info!("Resetting roast session.");
        self.samples.clear();
        self.session_origin = None;
        self.snapshot.samples = self.samples.snapshot();
        self.tx_snapshot.send_replace(self.snapshot.clone());
    }

    /// Run one tick at `now`. A failed read leaves every piece of state as it
    /// was and returns the error.
    pub fn tick(&mut self, now: Instant) -> Result<&TelemetrySnapshot, RoasterServiceError> {
        // Taken before the reads so a gesture made while the roaster answers
        // wins over the value it answered with.
        let epochs = ControlEpochs {
            target_temperature: self.controls.target_temperature.epoch(),
            section_time: self.controls.section_time.epoch(),
        };
        let observation = self.observe()?;

        match observation {
            Observation::Disconnected => {
                if self.snapshot.connected {
                    warn!("Roaster disconnected.");
                }
                self.snapshot.connected = false;
            }
            Observation::Connected(reading) => {
                if !self.snapshot.connected {
                    info!("Roaster connected.");
                }
                self.apply(reading, epochs, now);
            }
        }

        self.snapshot.target_temperature = self.controls.target_temperature.get();
        self.snapshot.section_time = self.controls.section_time.get();
        self.snapshot.samples = self.samples.snapshot();
        self.tx_snapshot.send_replace(self.snapshot.clone());

        Ok(&self.snapshot)
    }

    fn observe(&self) -> Result<Observation, RoasterServiceError> {
        if !self.roaster.is_connected()? {
            return Ok(Observation::Disconnected);
        }

        let status = self.roaster.current_status()?;
        let temperature = self.roaster.current_temperature()?;
        let target_temperature = self.roaster.target_temperature()?;
        let elapsed = if status.is_active() {
            Some((
                self.roaster.section_elapsed_seconds()?,
                self.roaster.total_elapsed_seconds()?,
            ))
        } else {
            None
        };

        Ok(Observation::Connected(DeviceReading {
            status,
            temperature,
            target_temperature,
            elapsed,
        }))
    }

    fn apply(&mut self, reading: DeviceReading, epochs: ControlEpochs, now: Instant) {
        self.snapshot.connected = true;
        self.snapshot.current_temperature = Some(reading.temperature);

        if self.last_status != Some(reading.status) {
            debug!("Roaster status is now {}.", reading.status);
        }

        if reading.status.is_active() {
            self.record_sample(reading.temperature, now);
        }

        if let Some((section, total)) = reading.elapsed {
            self.snapshot.section_elapsed = Elapsed::from(section);
            self.snapshot.total_elapsed = Elapsed::from(total);
            if !self
                .controls
                .section_time
                .try_set_since(epochs.section_time, SectionTime::clamped(section))
            {
                trace!("Section time slider was touched, not refreshing it.");
            }
        }

        if !self
            .controls
            .target_temperature
            .try_set_since(epochs.target_temperature, reading.target_temperature)
        {
            trace!("Target temperature slider was touched, not refreshing it.");
        }

        self.snapshot.status = reading.status;
        self.last_status = Some(reading.status);
    }

    fn record_sample(&mut self, temperature: Temperature, now: Instant) {
        let origin = match self.session_origin {
            Some(origin) => origin,
            None => {
                info!("Roast session started.");
                *self.session_origin.insert(now)
            }
        };
        let sample = Sample {
            timestamp: now.saturating_duration_since(origin),
            temperature,
        };
        match self.samples.push(sample) {
            Ok(_) => trace!("Recorded {}.", sample),
            Err(e) => warn!("Dropped sample. Error: {}", e),
        }
    }
}
