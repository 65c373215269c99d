//! The `Driver` struct and its tick loop.

use qsim_core::{
    AllocEvent, QsimError, Resource, ResourceId, ResourceStatus, Tick, User, UserId,
};

use crate::error::{DriverError, DriverResult};
use crate::observer::SimObserver;
use crate::strategy::{DurationSampler, ResourcePicker};

// ── Run summary ───────────────────────────────────────────────────────────────

/// Result of a bounded [`Driver::run`].
///
/// `completed == false` means the tick bound was hit before every resource
/// went quiescent.  That is a signal, not an error: the caller decides
/// whether an undrained simulation is a problem.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RunSummary {
    /// Ticks actually processed by this `run` call.
    pub ticks_elapsed: u64,
    /// True iff every resource was quiescent when `run` returned.
    pub completed:     bool,
}

// ── Dispatch report ───────────────────────────────────────────────────────────

/// Outcome of one [`Driver::dispatch_requests`] sweep.
///
/// Per-user failures are fatal to that single dispatch only; they are
/// collected here rather than aborting the sweep.
#[derive(Clone, Debug, Default)]
pub struct DispatchReport {
    /// Users granted a resource immediately.
    pub granted: usize,
    /// Users appended to a wait queue.
    pub queued:  usize,
    /// Users whose dispatch was skipped, with the reason.
    pub skipped: Vec<(UserId, QsimError)>,
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Owns the resource and user pools and advances logical time.
///
/// Resources are held in ascending-id order and advanced in that order each
/// tick, so event emission is deterministic.  Resources are independent;
/// the order matters only for reproducible output.
pub struct Driver {
    resources: Vec<Resource>,
    users:     Vec<User>,
    clock:     Tick,
}

impl Driver {
    // ── Construction ──────────────────────────────────────────────────────

    /// Build `n_resources` resources and `n_users` users with sequential
    /// ids starting at 1.  Users are named `"User {id}"`.
    pub fn new(n_resources: u32, n_users: u32) -> Self {
        let resources = (1..=n_resources).map(|i| Resource::new(ResourceId(i))).collect();
        let users = (1..=n_users)
            .map(|i| User::new(UserId(i), format!("User {i}")))
            .collect();
        Driver {
            resources,
            users,
            clock: Tick::ZERO,
        }
    }

    /// Like [`Driver::new`], but rejects an empty resource pool.
    ///
    /// A zero-resource driver is trivially quiescent and every dispatch
    /// would be skipped; callers that consider that a configuration bug use
    /// this constructor instead.
    pub fn try_new(n_resources: u32, n_users: u32) -> DriverResult<Self> {
        if n_resources == 0 {
            return Err(DriverError::Config("resource pool must not be empty".into()));
        }
        Ok(Self::new(n_resources, n_users))
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Issue one allocation request per user, in creation order.
    ///
    /// For each user: `picker` chooses a resource, `sampler` a duration,
    /// and the resource admits or queues the request.  A pick outside the
    /// pool (`UnknownResource`) or a zero duration (`InvalidDuration`)
    /// skips that user — no retry — and the sweep continues.  Successful
    /// dispatches record the user's assigned resource and are reported to
    /// `observer` as `Granted`/`Queued` events at the current clock value.
    pub fn dispatch_requests<P, D, O>(
        &mut self,
        picker:   &mut P,
        sampler:  &mut D,
        observer: &mut O,
    ) -> DispatchReport
    where
        P: ResourcePicker + ?Sized,
        D: DurationSampler + ?Sized,
        O: SimObserver + ?Sized,
    {
        let mut report = DispatchReport::default();

        for i in 0..self.users.len() {
            let user = self.users[i].id();
            let picked = picker.pick(user, &self.resources);

            let Some(slot) = self.resources.iter().position(|r| r.id() == picked) else {
                report.skipped.push((user, QsimError::UnknownResource(picked)));
                continue;
            };

            let duration = sampler.sample(user);
            match self.resources[slot].request(user, duration) {
                Ok(event) => {
                    self.users[i].assign(picked);
                    match event {
                        AllocEvent::Granted { .. } => report.granted += 1,
                        _ => report.queued += 1,
                    }
                    observer.on_event(self.clock, &event);
                }
                Err(err) => report.skipped.push((user, err)),
            }
        }

        report
    }

    // ── Time advancement ──────────────────────────────────────────────────

    /// Advance every resource by one tick, in ascending-id order, then
    /// increment and return the clock.
    ///
    /// Each resource's finish-and-promote step happens atomically inside
    /// `advance_tick`; its events are forwarded to `observer` only after
    /// that resource's update is complete.
    pub fn tick<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> Tick {
        let now = self.clock;
        observer.on_tick_start(now);
        for resource in &mut self.resources {
            let outcome = resource.advance_tick();
            for event in outcome.events(resource.id()) {
                observer.on_event(now, &event);
            }
        }
        observer.on_tick_end(now);
        self.clock = now + 1;
        self.clock
    }

    /// True iff every resource is idle with an empty wait queue.
    pub fn is_done(&self) -> bool {
        self.resources.iter().all(Resource::is_quiescent)
    }

    /// Tick until quiescence or until `max_ticks` ticks have been
    /// processed, whichever comes first.
    ///
    /// The bound guards against a demand profile that never drains; hitting
    /// it yields `completed == false` rather than an error.
    pub fn run<O: SimObserver + ?Sized>(&mut self, max_ticks: u64, observer: &mut O) -> RunSummary {
        let start = self.clock;
        let mut completed = self.is_done();
        while !completed && self.clock.since(start) < max_ticks {
            self.tick(observer);
            completed = self.is_done();
        }
        let summary = RunSummary {
            ticks_elapsed: self.clock.since(start),
            completed,
        };
        observer.on_run_end(&summary);
        summary
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The current clock value (number of ticks processed so far).
    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look up a resource by id.
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id() == id)
    }

    /// Snapshot every resource, in ascending-id order.
    pub fn statuses(&self) -> Vec<ResourceStatus> {
        self.resources.iter().map(Resource::status).collect()
    }
}
