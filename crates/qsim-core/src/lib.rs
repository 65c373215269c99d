//! `qsim-core` — foundational types for the qsim contention simulator.
//!
//! This crate holds the single piece of real machinery in the system: the
//! [`Resource`] FIFO state machine (`Idle → Occupied → Idle`, with a wait
//! queue promoted in strict arrival order).  Everything around it is plain
//! value types.
//!
//! # What lives here
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`ids`]      | `ResourceId`, `UserId`                              |
//! | [`time`]     | `Tick`                                              |
//! | [`rng`]      | `SimRng` (seeded, reproducible)                     |
//! | [`event`]    | `AllocEvent`                                        |
//! | [`resource`] | `Resource`, `TickOutcome`, `ResourceStatus`         |
//! | [`user`]     | `User`                                              |
//! | [`error`]    | `QsimError`, `QsimResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.|

pub mod error;
pub mod event;
pub mod ids;
pub mod resource;
pub mod rng;
pub mod time;
pub mod user;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{QsimError, QsimResult};
pub use event::AllocEvent;
pub use ids::{ResourceId, UserId};
pub use resource::{Resource, ResourceStatus, TickOutcome};
pub use rng::SimRng;
pub use time::Tick;
pub use user::User;
