//! `eco-sim` — lockstep driver for the rust_eco simulation.
//!
//! # Three-phase tick
//!
//! ```text
//! while calendar < config.end:            (checked by every worker)
//!   ① Compute: each role reads the pre-tick snapshot → Update
//!   ── barrier ──
//!   ② Commit:  each role's worker writes its Update into its owned fields
//!   ── barrier ──
//!   ③ Observe: observer, calendar += 1 month, readings = environment(month),
//!               sink.on_record(TickRecord)
//!   ── barrier ──
//! ```
//!
//! Roles run on one scoped thread each; the observer runs on one more.  The
//! barrier has `roles + 1` parties and is the only place a worker blocks.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use eco_core::{FieldSpec, SimConfig, StateSchema};
//! use eco_role::{FnRole, Update};
//! use eco_sim::{RecordBuffer, SimBuilder};
//!
//! let mut schema = StateSchema::new();
//! let count = schema.register(FieldSpec::count("count", 2.0))?;
//! let mut sim = SimBuilder::new(SimConfig::default(), schema)
//!     .role(FnRole::new("counter", vec![count], move |ctx| {
//!         Update::new().with(count, ctx.value(count) + 1.0)
//!     }))
//!     .build()?;
//! let mut records = RecordBuffer::new();
//! sim.run(&mut records)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod worker;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopSink, RecordBuffer, ReportSink, RunSummary, TickRecord};
pub use sim::Sim;
pub use worker::Phase;
