//! Fluent builder for constructing a [`Sim`].

use std::collections::HashMap;

use eco_barrier::{RendezvousBarrier, SpinPolicy};
use eco_core::{FieldId, RandomSource, Readings, SeededRng, SharedState, SimConfig, StateSchema};
use eco_role::{ConstantEnvironment, Environment, Role};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — start and end calendar, seed, spin limit
/// - [`StateSchema`] — the quantities and their initial values
/// - at least one [`Role`]
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                         |
/// |--------------------------|-------------------------------------------------|
/// | `.environment(e)`        | `ConstantEnvironment(Readings::default())`      |
/// | `.random_source(r)`      | `SeededRng::for_observer(config.seed)`          |
/// | `.initial_readings(r)`   | `environment.readings(config.start, rng)`       |
/// | `.barrier(b)`            | `roles + 1` parties, `config.spin_limit` spins  |
///
/// # Example
///
/// ```rust,ignore
/// let mut schema = StateSchema::new();
/// let deer = schema.register(FieldSpec::count("deer", 1.0).non_negative())?;
/// let mut sim = SimBuilder::new(config, schema)
///     .role(Deer::new(deer))
///     .environment(SeasonalClimate::default())
///     .build()?;
/// sim.run(&mut NoopSink)?;
/// ```
pub struct SimBuilder {
    config:           SimConfig,
    schema:           StateSchema,
    roles:            Vec<Box<dyn Role>>,
    environment:      Option<Box<dyn Environment>>,
    rng:              Option<Box<dyn RandomSource>>,
    initial_readings: Option<Readings>,
    barrier:          Option<RendezvousBarrier>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, schema: StateSchema) -> Self {
        Self {
            config,
            schema,
            roles:            Vec::new(),
            environment:      None,
            rng:              None,
            initial_readings: None,
            barrier:          None,
        }
    }

    /// Add one role.  Each role gets its own worker thread.
    pub fn role<R: Role + 'static>(mut self, role: R) -> Self {
        self.roles.push(Box::new(role));
        self
    }

    /// Add already-boxed roles.
    pub fn roles(mut self, roles: impl IntoIterator<Item = Box<dyn Role>>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// The environment hook the observer calls every tick.
    pub fn environment<E: Environment + 'static>(mut self, environment: E) -> Self {
        self.environment = Some(Box::new(environment));
        self
    }

    /// The observer's random source (environment noise).
    pub fn random_source<R: RandomSource + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Readings for the start month.  Without this they are drawn from the
    /// environment hook.
    pub fn initial_readings(mut self, readings: Readings) -> Self {
        self.initial_readings = Some(readings);
        self
    }

    /// Use a pre-built barrier.  Its party count must be `roles + 1`.
    pub fn barrier(mut self, barrier: RendezvousBarrier) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Validate inputs, seed the initial readings, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        self.schema.validate()?;

        if self.roles.is_empty() {
            return Err(SimError::NoRoles);
        }

        // ── Field ownership ───────────────────────────────────────────────
        let mut owner_of: HashMap<FieldId, usize> = HashMap::new();
        let mut owned = Vec::with_capacity(self.roles.len());
        for (i, role) in self.roles.iter().enumerate() {
            let fields = role.owned_fields();
            for &field in &fields {
                let spec = self.schema.spec(field).map_err(|_| SimError::UnknownField {
                    role: role.name().to_owned(),
                    field,
                })?;
                if let Some(&prev) = owner_of.get(&field) {
                    return Err(SimError::FieldOwnedTwice {
                        field:  spec.name.clone(),
                        first:  self.roles[prev].name().to_owned(),
                        second: role.name().to_owned(),
                    });
                }
                owner_of.insert(field, i);
            }
            owned.push(fields);
        }

        // ── Barrier ───────────────────────────────────────────────────────
        let parties = self.roles.len() + 1;
        let barrier = match self.barrier {
            Some(b) => {
                if b.parties() != parties {
                    return Err(SimError::PartyCountMismatch {
                        expected: parties,
                        got:      b.parties(),
                    });
                }
                b
            }
            None => RendezvousBarrier::with_policy(parties, SpinPolicy::new(self.config.spin_limit))?,
        };

        // ── Initial state ─────────────────────────────────────────────────
        let mut environment = self
            .environment
            .unwrap_or_else(|| Box::new(ConstantEnvironment(Readings::default())));
        let mut rng = self
            .rng
            .unwrap_or_else(|| Box::new(SeededRng::for_observer(self.config.seed)));
        let readings = match self.initial_readings {
            Some(r) => r,
            None => environment.readings(self.config.start, rng.as_mut()),
        };
        let state = SharedState::new(self.schema, self.config.start, readings);

        Ok(Sim {
            config: self.config,
            state,
            roles: self.roles,
            owned,
            environment,
            rng,
            barrier,
            ticks_run: 0,
        })
    }
}
