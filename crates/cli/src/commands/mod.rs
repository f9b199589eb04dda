//! Command implementations.

mod config;
mod demo;
mod trigger;

pub use config::run_config;
pub use demo::run_demo;
pub use trigger::run_trigger;
