//! contention — the reference contention scenario for qsim.
//!
//! Ten users contend for five resources; each requests one random resource
//! for a uniform 1–30 tick hold.  With twice as many users as resources,
//! some users always end up waiting, which is what the demo is meant to
//! show.  Pass a seed argument to replay a specific run: `contention 1234`.

use anyhow::{Context, Result};

use qsim_core::{AllocEvent, SimRng, Tick};
use qsim_driver::{Driver, RunSummary, SimObserver, UniformDuration, UniformPicker};

// ── Constants ─────────────────────────────────────────────────────────────────

const RESOURCE_COUNT: u32 = 5;
const USER_COUNT:     u32 = 10; // more users than resources → waiting scenarios
const MIN_DURATION:   u64 = 1;
const MAX_DURATION:   u64 = 30;
const DEFAULT_SEED:   u64 = 42;

/// Worst case: every user picks the same resource at maximum duration.
const MAX_TICKS: u64 = USER_COUNT as u64 * MAX_DURATION;

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints one line per allocation lifecycle event.  Status tables are
/// printed from `main` between phases; the core never prints anything.
struct EventPrinter;

impl SimObserver for EventPrinter {
    fn on_event(&mut self, tick: Tick, event: &AllocEvent) {
        println!("[{tick}] {event}");
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        if summary.completed {
            println!("all resources are free after {} ticks; simulation complete", summary.ticks_elapsed);
        } else {
            println!("tick bound hit after {} ticks with demand remaining", summary.ticks_elapsed);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().context("seed must be a u64")?,
        None => DEFAULT_SEED,
    };
    println!(
        "contention: {RESOURCE_COUNT} resources, {USER_COUNT} users, \
         durations {MIN_DURATION}..={MAX_DURATION}, seed {seed}"
    );

    let mut root = SimRng::new(seed);
    let mut picker = UniformPicker::new(root.child(0));
    let mut sampler = UniformDuration::new(root.child(1), MIN_DURATION..=MAX_DURATION);

    let mut driver = Driver::new(RESOURCE_COUNT, USER_COUNT);
    let mut observer = EventPrinter;

    let report = driver.dispatch_requests(&mut picker, &mut sampler, &mut observer);
    println!(
        "dispatched: {} granted, {} queued, {} skipped",
        report.granted,
        report.queued,
        report.skipped.len()
    );

    print_statuses(&driver);
    let summary = driver.run(MAX_TICKS, &mut observer);
    anyhow::ensure!(summary.completed, "finite demand should always drain");
    Ok(())
}

/// Per-resource status display, kept outside the core.
fn print_statuses(driver: &Driver) {
    for status in driver.statuses() {
        match status.occupant {
            Some((user, remaining)) => {
                println!("resource {} used by user {}, {remaining} ticks left", status.id.0, user.0)
            }
            None => println!("resource {} is free", status.id.0),
        }
        if !status.waiting.is_empty() {
            let names: Vec<String> = status.waiting.iter().map(|u| u.0.to_string()).collect();
            println!("  waiting: {}", names.join(", "));
        }
    }
}
