//! # Contracts
//!
//! Frozen interface contracts shared by every sigprof crate.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Capture model
//! - A `Signal` selects an ordered list of profile names from the `ProfileMap`
//! - Each name becomes one `CaptureRequest` rendered into one freshly created `Sink`
//! - Sink ownership travels with the capture: whoever holds the `Box<dyn Sink>` closes it

mod capture;
mod config;
mod error;
mod signal;
mod signal_source;
mod sink;

pub use capture::*;
pub use config::*;
pub use error::*;
pub use signal::*;
pub use signal_source::{LocalSignalSource, SignalSource};
pub use sink::*;
