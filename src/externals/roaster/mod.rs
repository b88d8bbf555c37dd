pub mod services;
pub mod simulated;
pub mod task;
