use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::telemetry::TelemetryController;

/// Task: Runs on a fixed cadence to read the roaster and publish telemetry
/// snapshots. The next tick starts one period after the previous one
/// finished, missed ticks are not caught up.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_poll_roaster_telemetry(
    token: CancellationToken,
    mut controller: TelemetryController,
    period: Duration,
) {
    info!("Started.");
    loop {
        business_logic(&mut controller);

        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = tokio::time::sleep(period) => {}
        };
    }
}

/// Perform task business logic.
/// Run one telemetry tick. A failed read only skips this tick.
#[tracing::instrument(skip_all)]
fn business_logic(controller: &mut TelemetryController) {
    trace!("Executing business logic.");
    match controller.tick(Instant::now()) {
        Ok(snapshot) => debug!("Published telemetry: {}", snapshot),
        Err(e) => warn!("Skipping telemetry tick. Error: {}", e),
    }
}
