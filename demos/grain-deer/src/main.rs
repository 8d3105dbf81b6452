//! grain-deer — a grain field, a deer herd and (optionally) a hunting office
//! advancing month by month in lockstep.
//!
//! ```text
//! grain-deer [config.json]
//! ```
//!
//! Prints one line per month, `year,month,temp,precip,deer,height[,licenses]`,
//! and writes the same records to `<output_dir>/records.csv`.  Set
//! `RUST_LOG=debug` to see per-tick and clamp logging.

mod climate;
mod config;
mod roles;


use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use eco_core::{FieldId, FieldSpec, StateSchema};
use eco_output::{CsvWriter, ReportOutputSink};
use eco_role::Role;
use eco_sim::{ReportSink, RunSummary, Sim, SimBuilder, TickRecord};

use climate::SeasonalClimate;
use config::DemoConfig;
use roles::{Deer, Grain, Hunting};

// ── Fields ────────────────────────────────────────────────────────────────────

/// Ids of the registered quantities.
#[derive(Copy, Clone, Debug)]
pub struct Fields {
    pub deer:     FieldId,
    pub height:   FieldId,
    pub licenses: Option<FieldId>,
}

/// Register the quantities, wire up the roles and build the sim.
pub fn build_sim(cfg: &DemoConfig) -> Result<(Sim, Fields)> {
    let mut schema = StateSchema::new();
    let deer = schema.register(FieldSpec::count("deer", cfg.initial_deer as f64).non_negative())?;
    let height = schema.register(FieldSpec::level("height", cfg.initial_height).non_negative())?;
    let licenses = if cfg.hunting {
        Some(schema.register(FieldSpec::count("licenses", 0.0).non_negative())?)
    } else {
        None
    };
    let fields = Fields { deer, height, licenses };

    let mut roles: Vec<Box<dyn Role>> = vec![
        Box::new(Deer { deer, height, licenses }),
        Box::new(Grain { height, deer, params: cfg.grain.clone() }),
    ];
    if let Some(licenses) = licenses {
        roles.push(Box::new(Hunting::new(licenses, deer)));
    }

    let sim = SimBuilder::new(cfg.sim.clone(), schema)
        .roles(roles)
        .environment(SeasonalClimate::new(cfg.climate.clone()))
        .build()?;
    Ok((sim, fields))
}

// ── Console sink ──────────────────────────────────────────────────────────────

/// Prints each record as a comma-separated line, then forwards it.
struct ConsoleSink<S: ReportSink> {
    inner:  S,
    fields: Fields,
}

impl<S: ReportSink> ConsoleSink<S> {
    fn line(&self, r: &TickRecord) -> String {
        let mut line = format!(
            "{},{},{:.2},{:.2},{},{:.2}",
            r.calendar.year,
            r.calendar.month,
            r.readings.temperature,
            r.readings.precipitation,
            r.value(self.fields.deer),
            r.value(self.fields.height),
        );
        if let Some(licenses) = self.fields.licenses {
            line.push_str(&format!(",{}", r.value(licenses)));
        }
        line
    }
}

impl<S: ReportSink> ReportSink for ConsoleSink<S> {
    fn on_start(&mut self, schema: &StateSchema) {
        self.inner.on_start(schema);
    }

    fn on_record(&mut self, record: &TickRecord) {
        println!("{}", self.line(record));
        self.inner.on_record(record);
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.inner.on_finish(summary);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => DemoConfig::from_json_file(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    log::info!(
        "grain-deer: {} -> {}, seed {}, hunting {}",
        cfg.sim.start,
        cfg.sim.end,
        cfg.sim.seed,
        if cfg.hunting { "on" } else { "off" }
    );

    let (mut sim, fields) = build_sim(&cfg)?;

    std::fs::create_dir_all(&cfg.output_dir)?;
    let writer = CsvWriter::new(&cfg.output_dir)?;
    let mut sink = ConsoleSink { inner: ReportOutputSink::new(writer), fields };

    let t0 = Instant::now();
    let summary = sim.run(&mut sink)?;
    let elapsed = t0.elapsed();

    if let Some(e) = sink.inner.take_error() {
        eprintln!("output error: {e}");
    }

    log::info!(
        "{} months simulated in {:.3} ms, records in {}",
        summary.ticks,
        elapsed.as_secs_f64() * 1e3,
        cfg.output_dir.join("records.csv").display()
    );
    Ok(())
}
