//! Shared simulation state.
//!
//! # Ownership discipline
//!
//! `SharedState` is handed to every worker by shared reference.  It carries
//! no lock: every slot is an atomic cell accessed with `Relaxed` ordering,
//! and all cross-thread visibility comes from the rendezvous barrier that
//! separates the Compute, Commit and Observe phases.  Each quantity has
//! exactly one writer (its owning role) and is written only during Commit;
//! the calendar and environment readings are written only by the observer
//! during Observe.  The type is data-race free on its own; the phase
//! discipline is what makes every read see a whole tick.
//!
//! Quantities are described up front by a [`StateSchema`] and addressed by
//! [`FieldId`].  Values are stored as `f64`; `Count` fields are rounded to an
//! integer on commit.

use std::sync::atomic::{AtomicI32, AtomicU8, AtomicU64, Ordering};

use crate::{Calendar, EcoError, EcoResult, FieldId};

// ── Field description ─────────────────────────────────────────────────────────

/// How a quantity's committed value is normalised.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Integral quantity (head counts, permits).  Rounded on commit.
    #[default]
    Count,
    /// Real-valued quantity (heights, volumes).
    Level,
}

/// One registered quantity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    pub name:    String,
    pub kind:    FieldKind,
    pub min:     Option<f64>,
    pub max:     Option<f64>,
    pub initial: f64,
}

impl FieldSpec {
    /// An unbounded integral quantity.
    pub fn count(name: impl Into<String>, initial: f64) -> Self {
        Self { name: name.into(), kind: FieldKind::Count, min: None, max: None, initial }
    }

    /// An unbounded real-valued quantity.
    pub fn level(name: impl Into<String>, initial: f64) -> Self {
        Self { name: name.into(), kind: FieldKind::Level, min: None, max: None, initial }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Shorthand for `with_min(0.0)`: populations and stocks never go negative.
    pub fn non_negative(self) -> Self {
        self.with_min(0.0)
    }

    /// Normalise `value` into this field's valid range.
    ///
    /// NaN becomes the lower bound (or 0 when unbounded below); `Count`
    /// values are rounded before the bounds are applied; a value still
    /// infinite after clamping falls back the same way as NaN.
    pub fn clamp(&self, value: f64) -> f64 {
        let fallback = self.min.unwrap_or(0.0);
        let mut v = if value.is_nan() { fallback } else { value };
        if self.kind == FieldKind::Count {
            v = v.round();
        }
        if let Some(lo) = self.min {
            v = v.max(lo);
        }
        if let Some(hi) = self.max {
            v = v.min(hi);
        }
        if v.is_finite() { v } else { fallback }
    }

    fn validate(&self) -> EcoResult<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(EcoError::InvalidBounds { name: self.name.clone(), min, max });
            }
        }
        if !self.initial.is_finite() || self.clamp(self.initial) != self.initial {
            return Err(EcoError::InitialOutOfBounds {
                name:  self.name.clone(),
                value: self.initial,
            });
        }
        Ok(())
    }
}

// ── StateSchema ───────────────────────────────────────────────────────────────

/// The ordered set of quantities a simulation tracks.
///
/// `FieldId`s are handed out in registration order and index directly into
/// [`SharedState`]'s slot array and into [`StateView::snapshot`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateSchema {
    fields: Vec<FieldSpec>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quantity and return its id.
    pub fn register(&mut self, spec: FieldSpec) -> EcoResult<FieldId> {
        if self.id(&spec.name).is_some() {
            return Err(EcoError::DuplicateField(spec.name));
        }
        spec.validate()?;
        let id = FieldId::try_from(self.fields.len())
            .map_err(|_| EcoError::Config("too many fields".into()))?;
        self.fields.push(spec);
        Ok(id)
    }

    /// Look a field up by name.
    pub fn id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| FieldId(i as u16))
    }

    pub fn spec(&self, id: FieldId) -> EcoResult<&FieldSpec> {
        self.fields.get(id.index()).ok_or(EcoError::FieldNotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: FieldId) -> bool {
        id.index() < self.fields.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldSpec)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, spec)| (FieldId(i as u16), spec))
    }

    /// Field names in id order.
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Re-check every field; used when a schema arrives via deserialisation.
    pub fn validate(&self) -> EcoResult<()> {
        for (i, spec) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(EcoError::DuplicateField(spec.name.clone()));
            }
            spec.validate()?;
        }
        Ok(())
    }
}

// ── Readings ──────────────────────────────────────────────────────────────────

/// Environment readings for the current month.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Readings {
    pub temperature:   f64,
    pub precipitation: f64,
}

// ── Slot ──────────────────────────────────────────────────────────────────────

/// An `f64` in an atomic cell.  Relaxed on both sides; ordering is the
/// barrier's job.
struct Slot(AtomicU64);

impl Slot {
    fn new(v: f64) -> Self {
        Slot(AtomicU64::new(v.to_bits()))
    }

    #[inline]
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

// ── SharedState ───────────────────────────────────────────────────────────────

/// Result of a single [`SharedState::commit`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CommitOutcome {
    /// The value actually written.
    pub stored:  f64,
    /// `true` if `stored` differs from the requested value beyond rounding.
    pub clamped: bool,
}

/// The simulation variables every worker can see.
pub struct SharedState {
    schema:        StateSchema,
    year:          AtomicI32,
    month:         AtomicU8,
    temperature:   Slot,
    precipitation: Slot,
    quantities:    Box<[Slot]>,
}

impl SharedState {
    /// Allocate one slot per schema field, initialised to its `initial` value.
    pub fn new(schema: StateSchema, calendar: Calendar, readings: Readings) -> Self {
        let quantities = schema
            .fields
            .iter()
            .map(|f| Slot::new(f.initial))
            .collect();
        Self {
            year:          AtomicI32::new(calendar.year),
            month:         AtomicU8::new(calendar.month),
            temperature:   Slot::new(readings.temperature),
            precipitation: Slot::new(readings.precipitation),
            quantities,
            schema,
        }
    }

    #[inline]
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// A read-only view for the Compute and Observe phases.
    #[inline]
    pub fn view(&self) -> StateView<'_> {
        StateView { state: self }
    }

    /// Write one quantity.  Commit phase only, by the field's owner only.
    ///
    /// # Panics
    /// Panics if `field` is not part of this state's schema.
    pub fn commit(&self, field: FieldId, value: f64) -> CommitOutcome {
        let spec = &self.schema.fields[field.index()];
        let stored = spec.clamp(value);
        let requested = if spec.kind == FieldKind::Count { value.round() } else { value };
        self.quantities[field.index()].store(stored);
        CommitOutcome { stored, clamped: stored != requested }
    }

    /// Observe phase only, by the observer only.
    pub fn set_calendar(&self, calendar: Calendar) {
        self.year.store(calendar.year, Ordering::Relaxed);
        self.month.store(calendar.month, Ordering::Relaxed);
    }

    /// Observe phase only, by the observer only.
    pub fn set_readings(&self, readings: Readings) {
        self.temperature.store(readings.temperature);
        self.precipitation.store(readings.precipitation);
    }
}

// ── StateView ─────────────────────────────────────────────────────────────────

/// Read-only access to [`SharedState`].
///
/// Handed to roles during Compute; holding one gives no way to write.
#[derive(Copy, Clone)]
pub struct StateView<'a> {
    state: &'a SharedState,
}

impl<'a> StateView<'a> {
    #[inline]
    pub fn schema(&self) -> &'a StateSchema {
        &self.state.schema
    }

    #[inline]
    pub fn calendar(&self) -> Calendar {
        Calendar {
            year:  self.state.year.load(Ordering::Relaxed),
            month: self.state.month.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub fn readings(&self) -> Readings {
        Readings {
            temperature:   self.state.temperature.load(),
            precipitation: self.state.precipitation.load(),
        }
    }

    /// Current value of a quantity.
    ///
    /// # Panics
    /// Panics if `field` is not part of this state's schema.
    #[inline]
    pub fn value(&self, field: FieldId) -> f64 {
        self.state.quantities[field.index()].load()
    }

    /// Current value of a `Count` quantity as an integer.
    #[inline]
    pub fn count(&self, field: FieldId) -> i64 {
        self.value(field) as i64
    }

    /// Non-panicking lookup.
    pub fn try_value(&self, field: FieldId) -> EcoResult<f64> {
        self.state
            .quantities
            .get(field.index())
            .map(Slot::load)
            .ok_or(EcoError::FieldNotFound(field))
    }

    /// Lookup by field name.
    pub fn get(&self, name: &str) -> EcoResult<f64> {
        let id = self
            .state
            .schema
            .id(name)
            .ok_or_else(|| EcoError::UnknownFieldName(name.to_owned()))?;
        Ok(self.value(id))
    }

    /// All quantities in schema order.
    pub fn snapshot(&self) -> Vec<f64> {
        self.state.quantities.iter().map(Slot::load).collect()
    }
}
