pub mod display;
pub mod roaster;
