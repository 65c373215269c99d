//! Simulation observer trait for progress reporting and data collection.

use qsim_core::{AllocEvent, Tick};

use crate::driver::RunSummary;

/// Callbacks invoked by [`Driver`][crate::Driver] at key points in the run.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Events carry the tick at which they
/// occurred; dispatch-time events (`Granted`/`Queued`) carry the clock value
/// at dispatch.
///
/// # Example — event printer
///
/// ```rust,ignore
/// struct EventPrinter;
///
/// impl SimObserver for EventPrinter {
///     fn on_event(&mut self, tick: Tick, event: &AllocEvent) {
///         println!("[{tick}] {event}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, before any resource is advanced.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per allocation lifecycle event, in deterministic order
    /// (ascending resource id within a tick; `Finished` before `Promoted`
    /// for the same resource).
    fn on_event(&mut self, _tick: Tick, _event: &AllocEvent) {}

    /// Called at the end of each tick, after every resource has advanced.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called once when [`Driver::run`][crate::Driver::run] returns, whether
    /// or not quiescence was reached.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
