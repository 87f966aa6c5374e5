pub mod fake_platform;
pub mod fixtures;
pub mod recorders;
