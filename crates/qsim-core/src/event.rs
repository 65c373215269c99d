//! Allocation lifecycle events.
//!
//! Resource operations return these as plain values; the driver forwards
//! them to its observer.  The core never prints and never calls back into
//! the caller mid-update, so the state machine stays independently testable.

use std::fmt;

use crate::{ResourceId, UserId};

/// One step in a request's lifecycle, in the order they can occur:
/// `Granted` or `Queued` at dispatch, then `Finished` (and possibly a
/// `Promoted` for the next waiter) at a tick boundary.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocEvent {
    /// The resource was idle; the user holds it immediately.
    Granted {
        resource: ResourceId,
        user:     UserId,
        duration: u64,
    },
    /// The resource was occupied; the user joined the tail of the wait queue.
    Queued {
        resource: ResourceId,
        user:     UserId,
    },
    /// The occupant's countdown reached zero and it released the resource.
    Finished {
        resource: ResourceId,
        user:     UserId,
    },
    /// The head of the wait queue was granted in the same tick the previous
    /// occupant finished.
    Promoted {
        resource: ResourceId,
        user:     UserId,
        duration: u64,
    },
}

impl AllocEvent {
    /// The resource this event concerns.
    pub fn resource(&self) -> ResourceId {
        match *self {
            AllocEvent::Granted { resource, .. }
            | AllocEvent::Queued { resource, .. }
            | AllocEvent::Finished { resource, .. }
            | AllocEvent::Promoted { resource, .. } => resource,
        }
    }

    /// The user this event concerns.
    pub fn user(&self) -> UserId {
        match *self {
            AllocEvent::Granted { user, .. }
            | AllocEvent::Queued { user, .. }
            | AllocEvent::Finished { user, .. }
            | AllocEvent::Promoted { user, .. } => user,
        }
    }
}

impl fmt::Display for AllocEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AllocEvent::Granted { resource, user, duration } => {
                write!(f, "resource {} granted to user {} for {} ticks", resource.0, user.0, duration)
            }
            AllocEvent::Queued { resource, user } => {
                write!(f, "user {} queued on resource {}", user.0, resource.0)
            }
            AllocEvent::Finished { resource, user } => {
                write!(f, "user {} finished with resource {}", user.0, resource.0)
            }
            AllocEvent::Promoted { resource, user, duration } => {
                write!(f, "user {} promoted on resource {} for {} ticks", user.0, resource.0, duration)
            }
        }
    }
}
