pub mod telemetry_poller;
