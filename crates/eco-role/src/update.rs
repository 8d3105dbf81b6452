//! Per-tick scratch values.

use eco_core::FieldId;

/// The values a role computed this tick, keyed by the field they go into.
///
/// Produced by [`Role::compute`][crate::Role::compute], held by the worker
/// across the compute barrier, and written during Commit.  Setting the same
/// field twice keeps the last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Update {
    writes: Vec<(FieldId, f64)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`][Self::set].
    pub fn with(mut self, field: FieldId, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldId, value: f64) -> &mut Self {
        match self.writes.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: FieldId) -> Option<f64> {
        self.writes.iter().find(|(f, _)| *f == field).map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, f64)> + '_ {
        self.writes.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
