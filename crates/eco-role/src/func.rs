//! Closure-backed roles.

use eco_core::FieldId;

use crate::{Role, TickContext, Update};

/// A [`Role`] whose compute rule is a closure.
///
/// ```rust,ignore
/// let counter = FnRole::new("counter", vec![count], move |ctx| {
///     Update::new().with(count, ctx.value(count) + 1.0)
/// });
/// ```
pub struct FnRole<F> {
    name:  String,
    owned: Vec<FieldId>,
    rule:  F,
}

impl<F> FnRole<F>
where
    F: FnMut(&TickContext<'_>) -> Update + Send,
{
    pub fn new(name: impl Into<String>, owned: Vec<FieldId>, rule: F) -> Self {
        Self { name: name.into(), owned, rule }
    }
}

impl<F> Role for FnRole<F>
where
    F: FnMut(&TickContext<'_>) -> Update + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        self.owned.clone()
    }

    fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
        (self.rule)(ctx)
    }
}
