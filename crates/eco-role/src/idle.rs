//! A role that owns nothing and computes nothing.

use eco_core::FieldId;

use crate::{Role, TickContext, Update};

/// A [`Role`] that always returns an empty update.
///
/// Useful as a placeholder in tests, or to add a party that only
/// participates in the barrier rounds.
pub struct IdleRole;

impl Role for IdleRole {
    fn name(&self) -> &str {
        "idle"
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        vec![]
    }

    fn compute(&mut self, _ctx: &TickContext<'_>) -> Update {
        Update::new()
    }
}
