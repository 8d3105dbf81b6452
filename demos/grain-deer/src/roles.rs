//! The three ecosystem roles.
//!
//! | Role      | Owns       | Reads                          |
//! |-----------|------------|--------------------------------|
//! | `Grain`   | `height`   | readings, `deer`               |
//! | `Deer`    | `deer`     | `height`, `licenses` (if any)  |
//! | `Hunting` | `licenses` | `deer`                         |

use eco_core::FieldId;
use eco_role::{Role, TickContext, Update};
use serde::Deserialize;

// ── Grain ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GrainParams {
    /// Inches of growth in a month with ideal weather.
    pub growth_per_month: f64,
    /// Inches one deer eats per month.
    pub eaten_per_deer:   f64,
    /// Temperature at which growth peaks.
    pub mid_temp:         f64,
    /// Precipitation at which growth peaks.
    pub mid_precip:       f64,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            growth_per_month: 8.0,
            eaten_per_deer:   0.5,
            mid_temp:         40.0,
            mid_precip:       10.0,
        }
    }
}

/// Grain height: weather-driven growth minus what the herd eats.
pub struct Grain {
    pub height: FieldId,
    pub deer:   FieldId,
    pub params: GrainParams,
}

impl Grain {
    /// Growth factor in `(0, 1]` for the given readings.
    pub fn weather_factor(&self, temperature: f64, precipitation: f64) -> f64 {
        let sqr = |x: f64| x * x;
        let t = (-sqr((temperature - self.params.mid_temp) / 10.0)).exp();
        let p = (-sqr((precipitation - self.params.mid_precip) / 10.0)).exp();
        t * p
    }
}

impl Role for Grain {
    fn name(&self) -> &str {
        "grain"
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        vec![self.height]
    }

    /// Negative heights are clamped to 0 by the field's bounds.
    fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
        let r = ctx.readings;
        let grown = self.weather_factor(r.temperature, r.precipitation) * self.params.growth_per_month;
        let eaten = ctx.count(self.deer) as f64 * self.params.eaten_per_deer;
        Update::new().with(self.height, ctx.value(self.height) + grown - eaten)
    }
}

// ── Deer ──────────────────────────────────────────────────────────────────────

/// Herd size: one step per month toward the grain's carrying capacity, less
/// whatever the current licenses take.
pub struct Deer {
    pub deer:     FieldId,
    pub height:   FieldId,
    /// `None` in the variant without a hunting role.
    pub licenses: Option<FieldId>,
}

impl Role for Deer {
    fn name(&self) -> &str {
        "deer"
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        vec![self.deer]
    }

    fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
        let now = ctx.count(self.deer);
        let capacity = ctx.value(self.height).floor() as i64;
        let mut next = match now.cmp(&capacity) {
            std::cmp::Ordering::Less => now + 1,
            std::cmp::Ordering::Greater => now - 1,
            std::cmp::Ordering::Equal => now,
        }
        .max(0);
        if let Some(licenses) = self.licenses {
            next = (next - ctx.count(licenses)).max(0);
        }
        Update::new().with(self.deer, next as f64)
    }
}

// ── Hunting ───────────────────────────────────────────────────────────────────

/// Hunting licenses issued for the month.
///
/// Decides from the herd size at the start of the tick, the same snapshot the
/// `Deer` role reads, so licenses react to the herd with a one-month lag.
pub struct Hunting {
    pub licenses:  FieldId,
    pub deer:      FieldId,
    /// More than this many deer triggers the high quota.
    pub threshold: i64,
    pub high:      i64,
    pub low:       i64,
}

impl Hunting {
    pub fn new(licenses: FieldId, deer: FieldId) -> Self {
        Self { licenses, deer, threshold: 5, high: 3, low: 1 }
    }
}

impl Role for Hunting {
    fn name(&self) -> &str {
        "hunting"
    }

    fn owned_fields(&self) -> Vec<FieldId> {
        vec![self.licenses]
    }

    fn compute(&mut self, ctx: &TickContext<'_>) -> Update {
        let quota = if ctx.count(self.deer) > self.threshold { self.high } else { self.low };
        Update::new().with(self.licenses, quota as f64)
    }
}
