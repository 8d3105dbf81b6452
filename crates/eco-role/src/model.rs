//! The `Role` trait — the main extension point for user code.

use eco_core::FieldId;

use crate::{TickContext, Update};

/// One concurrent agent's compute rule.
///
/// The driver runs every role on its own thread.  Each tick it calls
/// [`compute`][Self::compute] with the pre-tick snapshot, then commits the
/// returned [`Update`] into the fields this role listed in
/// [`owned_fields`][Self::owned_fields].  Writing any other field is a
/// protocol violation and panics the worker.
///
/// Ownership is exclusive: the builder rejects two roles claiming the same
/// field.  A role may hold private state such as its own
/// [`SeededRng`][eco_core::SeededRng], but anything other roles need to see
/// must be committed.
///
/// # Example
///
/// ```rust,ignore
/// struct Grazers { herd: FieldId, grass: FieldId }
///
/// impl Role for Grazers {
///     fn name(&self) -> &str { "grazers" }
///     fn owned_fields(&self) -> Vec<FieldId> { vec![self.herd] }
///     fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
///         let capacity = ctx.value(self.grass).floor();
///         let herd = ctx.value(self.herd);
///         Update::new().with(self.herd, herd + (capacity - herd).signum())
///     }
/// }
/// ```
pub trait Role: Send {
    /// Label used in logs and errors.
    fn name(&self) -> &str;

    /// Fields this role writes.  Read once, at build time.
    fn owned_fields(&self) -> Vec<FieldId>;

    /// Compute next values from the pre-tick snapshot.
    fn compute(&mut self, ctx: &TickContext<'_>) -> Update;
}

impl<R: Role + ?Sized> Role for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        (**self).owned_fields()
    }

    fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
        (**self).compute(ctx)
    }
}
