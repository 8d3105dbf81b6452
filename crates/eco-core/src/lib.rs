//! `eco-core` — foundational types for the `rust_eco` lockstep simulation.
//!
//! This crate is a dependency of every other `eco-*` crate.  It has no
//! `eco-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `FieldId`, `RoleId`                                        |
//! | [`time`]    | `Calendar`, `SimConfig`                                    |
//! | [`state`]   | `StateSchema`, `FieldSpec`, `SharedState`, `StateView`     |
//! | [`rng`]     | `RandomSource` trait, `SeededRng`                          |
//! | [`error`]   | `EcoError`, `EcoResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and schema types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod state;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EcoError, EcoResult};
pub use ids::{FieldId, RoleId};
pub use rng::{RandomSource, SeededRng};
pub use state::{CommitOutcome, FieldKind, FieldSpec, Readings, SharedState, StateSchema, StateView};
pub use time::{Calendar, SimConfig};
