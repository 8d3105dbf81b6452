//! `eco-role` — the pluggable parts of a tick.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`update`]      | `Update` — a role's per-tick scratch values               |
//! | [`context`]     | `TickContext<'a>` — read-only pre-tick snapshot           |
//! | [`model`]       | `Role` trait                                              |
//! | [`func`]        | `FnRole` — a role from a closure                          |
//! | [`idle`]        | `IdleRole` — placeholder that owns and computes nothing   |
//! | [`environment`] | `Environment` trait, `ConstantEnvironment`                |
//!
//! # Design notes
//!
//! The three-phase tick in eco-sim works as follows:
//!
//! 1. **Compute** (one thread per role): call `Role::compute` with a
//!    `&TickContext`.  All reads go through a `StateView`; no mutation.
//!
//! 2. **Commit**: each worker writes its own `Update` into the fields its
//!    role declared in `owned_fields`.
//!
//! 3. **Observe**: the observer worker advances the calendar and asks the
//!    `Environment` for the next month's readings.
//!
//! A role only ever sees a `StateView`, so it cannot write outside Commit.

pub mod context;
pub mod environment;
pub mod func;
pub mod idle;
pub mod model;
pub mod update;

#[cfg(test)]
mod tests;

pub use context::TickContext;
pub use environment::{ConstantEnvironment, Environment};
pub use func::FnRole;
pub use idle::IdleRole;
pub use model::Role;
pub use update::Update;
