use std::sync::Arc;

use anyhow::Result;
use roast_control::{
    config::RoastConfig,
    controls::{ControlPanel, Controls},
    externals::{
        display::task::task_render_telemetry,
        roaster::{simulated::SimulatedRoaster, task::task_simulate_roaster},
    },
    tasks::telemetry_poller::task_poll_roaster_telemetry,
    telemetry::TelemetryController,
};
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RoastConfig::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_max_level(config.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    // NOTE: Stands in for the appliance driver.
    let roaster = Arc::new(SimulatedRoaster::new());
    roaster.set_connected(true);

    let controls = Arc::new(Controls::default());
    let panel = ControlPanel::new(roaster.clone(), controls.clone());

    let controller = TelemetryController::new(roaster.clone(), controls.clone());
    let rx_snapshot = controller.subscribe();

    let token_clone = token.clone();
    let poll_period = config.poll_period;
    tracker.spawn(async move {
        task_poll_roaster_telemetry(token_clone, controller, poll_period).await
    });

    let token_clone = token.clone();
    let display_period = config.display_period;
    tracker.spawn(async move {
        task_render_telemetry(token_clone, rx_snapshot, display_period).await
    });

    let token_clone = token.clone();
    let roaster_clone = roaster.clone();
    let simulation_period = config.simulation_period;
    tracker.spawn(async move {
        task_simulate_roaster(token_clone, roaster_clone, simulation_period).await
    });

    // NOTE: A short demo roast, as an operator would start it from the panel.
    panel.change_fan_speed(5)?;
    panel.move_target_temperature(440)?;
    panel.move_section_time(600)?;
    panel.start_roast()?;

    let token_clone = token.clone();

    tokio::select! {
        _ = token_clone.cancelled() => {}
        res = signal::ctrl_c() => {
            match res {
                Ok(_) => {
                    token.cancel();
                },
                Err(e)=>{
                    tracing::error!("Failed to listen for ctrl_c. Error: {}", e);
                    token.cancel();
                }
            };
        },
    }

    tracker.close();
    tracker.wait().await;

    Ok(())
}
