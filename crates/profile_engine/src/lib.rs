//! # Profile Engine
//!
//! Production `ProfileEngine`: renders point-in-time runtime profiles and
//! drives the continuous CPU capture lifecycle.
//!
//! ## Profiles
//!
//! - `threads` - OS threads of the process plus the capturing backtrace
//! - `tasks` - tokio runtime snapshot
//! - `heap` - jemalloc statistics
//! - `cpu` - pprof samples for a fixed duration, encoded as pprof protobuf

mod continuous;
mod engine;
mod snapshot;

pub use continuous::CpuProfiler;
pub use engine::RuntimeProfiler;
pub use snapshot::Snapshot;
