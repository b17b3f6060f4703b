//! Institution override rules and independent forecasts layered on top of an external
//! vaccine decision support engine.

pub mod config;
pub mod error;
pub mod forecast;
pub mod telemetry;
