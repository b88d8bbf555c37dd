use std::time::Duration;

use futures::StreamExt;
use tokio::{sync::watch::Receiver, time::MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::telemetry_snapshot::TelemetrySnapshot;

pub const NOT_CONNECTED_NOTICE: &str = "Please connect your roaster.";

/// Task: Redraws the panel from the latest telemetry snapshot on its own
/// cadence, independent of the poller's ticks.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_render_telemetry(
    token: CancellationToken,
    rx_snapshot: Receiver<TelemetrySnapshot>,
    period: Duration,
) {
    info!("Started.");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = IntervalStream::new(interval);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            Some(_) = frames.next() => {
                let lines = render_panel(&rx_snapshot.borrow());
                for line in lines {
                    info!("{}", line);
                }
            }
        };
    }
}

/// Text rendering of the gauges and the connection notice.
pub fn render_panel(snapshot: &TelemetrySnapshot) -> Vec<String> {
    if snapshot.notice_visible() {
        return vec![NOT_CONNECTED_NOTICE.to_string()];
    }

    let current = snapshot
        .current_temperature
        .map(|t| format!("{:.0}", t.value))
        .unwrap_or_else(|| "--".into());

    let mut lines = vec![
        format!("STATUS: {}", snapshot.status),
        format!(
            "CURRENT TEMP: {} | TARGET TEMP: {}",
            current, snapshot.target_temperature
        ),
        format!(
            "CURRENT SECTION TIME: {} | TOTAL TIME: {}",
            snapshot.section_elapsed, snapshot.total_elapsed
        ),
    ];
    if let Some(last) = snapshot.samples.last() {
        lines.push(format!(
            "PLOT: {} samples, last {}",
            snapshot.samples.len(),
            last
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::watch;

    use crate::models::{
        device_status::DeviceStatus, elapsed::Elapsed, sample::Sample,
        setpoint::TargetTemperature, temperature::Temperature,
    };

    use super::*;

    #[test]
    fn test_disconnected_panel_only_shows_notice() {
        let lines = render_panel(&TelemetrySnapshot::default());
        assert_eq!(lines, vec![NOT_CONNECTED_NOTICE.to_string()]);
    }

    #[test]
    fn test_connected_panel_shows_gauges() {
        let temperature = Temperature::try_from(401.4f32).expect("Failed to get temperature");
        let snapshot = TelemetrySnapshot {
            connected: true,
            status: DeviceStatus::Roasting,
            current_temperature: Some(temperature),
            section_elapsed: Elapsed::from(65),
            total_elapsed: Elapsed::from(3661),
            target_temperature: TargetTemperature::clamped(420),
            samples: Arc::new(vec![Sample {
                timestamp: Duration::from_secs(2),
                temperature,
            }]),
            ..Default::default()
        };

        let lines = render_panel(&snapshot);
        assert_eq!(lines[0], "STATUS: roasting");
        assert_eq!(lines[1], "CURRENT TEMP: 401 | TARGET TEMP: 420");
        assert_eq!(lines[2], "CURRENT SECTION TIME: 01:05 | TOTAL TIME: 61:01");
        assert!(lines[3].starts_with("PLOT: 1 samples"));
    }

    #[tokio::test]
    async fn test_render_task_stops_on_cancel() {
        let (_tx, rx) = watch::channel(TelemetrySnapshot::default());
        let token = CancellationToken::new();
        let handle = tokio::spawn(task_render_telemetry(
            token.clone(),
            rx,
            Duration::from_millis(5),
        ));

        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("Render task did not stop after cancel")
            .expect("Render task panicked");
    }
}
