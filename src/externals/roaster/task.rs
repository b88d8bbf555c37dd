use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use super::simulated::SimulatedRoaster;

/// Task: Advances the simulated roaster once per period so the control panel
/// has a live appliance to poll.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_simulate_roaster(
    token: CancellationToken,
    roaster: Arc<SimulatedRoaster>,
    period: Duration,
) {
    info!("Started.");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = tokio::time::sleep(period) => {
                trace!("Advancing simulated roaster by {:?}.", period);
                roaster.advance(period);
            }
        };
    }
}
