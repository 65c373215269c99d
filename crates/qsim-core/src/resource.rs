//! `Resource` — the single-occupant FIFO state machine.
//!
//! # State machine
//!
//! ```text
//! Idle ──request──▶ Occupied ──countdown hits 0──▶ Idle
//!                      ▲                             │
//!                      └──────promote queue head─────┘ (same tick)
//! ```
//!
//! A resource serves at most one user at a time.  A request against an idle
//! resource is granted immediately; against an occupied one it joins the
//! tail of the wait queue.  When the occupant's countdown reaches zero the
//! resource releases it and, within the same `advance_tick` call, grants the
//! queue head — the promoted user's full duration starts counting from the
//! next tick, so nothing is lost to the hand-off.
//!
//! # Invariants
//!
//! - An occupant is present iff `remaining > 0`.
//! - A queue entry is removed exactly once, at the moment it is promoted.
//! - The queue is never reordered.

use std::collections::VecDeque;

use crate::error::{QsimError, QsimResult};
use crate::event::AllocEvent;
use crate::ids::{ResourceId, UserId};

// ── Pending ───────────────────────────────────────────────────────────────────

/// One wait-queue entry: who is waiting and for how long they will hold the
/// resource once granted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pending {
    pub user:     UserId,
    pub duration: u64,
}

// ── TickOutcome ───────────────────────────────────────────────────────────────

/// What happened inside one `advance_tick` call.
///
/// At most one occupant can finish per tick, and at most one waiter can be
/// promoted (the queue head, in the same call).  Both fields are `None` for
/// an idle resource or an occupant with time still remaining.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickOutcome {
    /// The occupant whose countdown reached zero this tick.
    pub finished: Option<UserId>,
    /// The queue head granted in the same tick, with its duration.
    pub promoted: Option<(UserId, u64)>,
}

impl TickOutcome {
    /// The events this outcome corresponds to, in emission order
    /// (`Finished` before `Promoted`).
    pub fn events(&self, resource: ResourceId) -> impl Iterator<Item = AllocEvent> + use<> {
        let finished = self
            .finished
            .map(|user| AllocEvent::Finished { resource, user });
        let promoted = self
            .promoted
            .map(|(user, duration)| AllocEvent::Promoted { resource, user, duration });
        finished.into_iter().chain(promoted)
    }
}

// ── ResourceStatus ────────────────────────────────────────────────────────────

/// Read-only snapshot of a resource for reporting.  Taking one never
/// mutates the resource.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceStatus {
    pub id:        ResourceId,
    /// `(occupant, ticks remaining)`, or `None` when idle.
    pub occupant:  Option<(UserId, u64)>,
    /// Waiting users in grant order (head first).
    pub waiting:   Vec<UserId>,
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// A single-occupant resource with a FIFO wait queue.
///
/// The owner (normally the driver) has exclusive access; every mutation
/// happens through `&mut self`, so one `advance_tick` — decrement, release
/// check, promotion — is atomic as a unit by construction.
#[derive(Clone, Debug)]
pub struct Resource {
    id:        ResourceId,
    occupant:  Option<UserId>,
    /// Ticks left for the current occupant; meaningful only while one is
    /// present, and kept at 0 otherwise.
    remaining: u64,
    waiting:   VecDeque<Pending>,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Resource {
            id,
            occupant:  None,
            remaining: 0,
            waiting:   VecDeque::new(),
        }
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Request this resource for `duration` ticks.
    ///
    /// Idle → immediate grant (`Granted`).  Occupied → appended to the wait
    /// queue tail (`Queued`).  Acceptance is unconditional except for a zero
    /// duration, which is rejected with state untouched — no occupant set,
    /// no queue entry added.
    pub fn request(&mut self, user: UserId, duration: u64) -> QsimResult<AllocEvent> {
        if duration == 0 {
            return Err(QsimError::InvalidDuration { user, requested: duration });
        }

        match self.occupant {
            None => {
                self.occupant = Some(user);
                self.remaining = duration;
                Ok(AllocEvent::Granted { resource: self.id, user, duration })
            }
            Some(_) => {
                self.waiting.push_back(Pending { user, duration });
                Ok(AllocEvent::Queued { resource: self.id, user })
            }
        }
    }

    // ── Time advancement ──────────────────────────────────────────────────

    /// Advance this resource by one tick.
    ///
    /// No-op when idle.  Otherwise decrements the occupant's countdown; on
    /// reaching zero the occupant is released and, if anyone is waiting, the
    /// queue head is granted within this same call.  The promoted user's
    /// countdown starts at its full requested duration — it does not lose a
    /// tick to the hand-off.
    pub fn advance_tick(&mut self) -> TickOutcome {
        let Some(user) = self.occupant else {
            return TickOutcome::default();
        };

        self.remaining -= 1;
        if self.remaining > 0 {
            return TickOutcome::default();
        }

        self.occupant = None;
        let promoted = self.waiting.pop_front().map(|next| {
            self.occupant = Some(next.user);
            self.remaining = next.duration;
            (next.user, next.duration)
        });

        TickOutcome { finished: Some(user), promoted }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// True iff idle with an empty wait queue.
    pub fn is_quiescent(&self) -> bool {
        self.occupant.is_none() && self.waiting.is_empty()
    }

    /// Snapshot the occupant, countdown, and ordered waiting list.
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus {
            id:       self.id,
            occupant: self.occupant.map(|user| (user, self.remaining)),
            waiting:  self.waiting.iter().map(|p| p.user).collect(),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn occupant(&self) -> Option<UserId> {
        self.occupant
    }

    /// Ticks left for the current occupant (0 when idle).
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }
}
