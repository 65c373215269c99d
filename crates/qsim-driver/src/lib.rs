//! `qsim-driver` — the tick loop orchestrator for qsim.
//!
//! # Control flow
//!
//! ```text
//! Driver::new(n, m)                 — n resources, m users, ids from 1
//! dispatch_requests(picker, sampler, observer)
//!                                   — one request per user, in creation
//!                                     order; per-user errors skip that
//!                                     user only
//! run(max_ticks, observer)          — tick every resource in ascending-id
//!                                     order until quiescent or the bound;
//!                                     returns {ticks_elapsed, completed}
//! ```
//!
//! Selection and duration generation are injected through the
//! [`ResourcePicker`] and [`DurationSampler`] traits so tests can drive the
//! mechanism with fixed sequences instead of random draws.  All reporting
//! flows through [`SimObserver`] callbacks; the driver itself never prints.

pub mod driver;
pub mod error;
pub mod observer;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use driver::{DispatchReport, Driver, RunSummary};
pub use error::{DriverError, DriverResult};
pub use observer::{NoopObserver, SimObserver};
pub use strategy::{
    DurationSampler, FixedDurations, PickFn, ResourcePicker, RoundRobinPicker, SampleFn,
    UniformDuration, UniformPicker,
};
