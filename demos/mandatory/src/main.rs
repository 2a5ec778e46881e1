//! mandatory: work and school tour scheduling for a synthetic population.
//!
//! Builds one tour table holding work and school tours, then runs the two
//! departure-and-duration models in sequence against a shared set of
//! hourly time windows (05:00 to 23:00).  Each pass prints its choice
//! shares; the scheduled tours are written as CSV.
//!
//! ```text
//! mandatory [config.json] [output_dir]
//! ```
//!
//! `config.json` holds a `RunConfig`, e.g.
//! `{"chunk_size": 10000, "seed": 7, "trace_agent": 42}`.  Logging is
//! controlled with `RUST_LOG` (`RUST_LOG=debug` shows every chunk).

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use dcm_agent::{AgentTable, AgentTableBuilder};
use dcm_core::{AgentId, Column, RunConfig};
use dcm_output::{CsvWriter, write_schedule};
use dcm_schedule::TourScheduler;
use dcm_spec::{load_alternatives_reader, load_spec_reader};

// ── Constants ─────────────────────────────────────────────────────────────────

const TOUR_COUNT:     usize = 50_000;
const POPULATION_SEED: u64  = 2024;
const DEFAULT_OUTPUT: &str  = "output/mandatory";

/// Passes run in this order; later passes never overwrite earlier ones.
const SEGMENTS: [&str; 2] = ["work", "school"];

const TDD_ALTS_CSV:   &str = include_str!("../data/tdd_alts.csv");
const TDD_WORK_CSV:   &str = include_str!("../data/tdd_work.csv");
const TDD_SCHOOL_CSV: &str = include_str!("../data/tdd_school.csv");

// ── Synthetic tours ───────────────────────────────────────────────────────────

/// Roughly 70 % work tours, the rest school tours.  Person attributes are
/// drawn to match the tour purpose.
fn synthetic_tours(count: usize, chunk_size: usize) -> Result<AgentTable> {
    let mut rng = SmallRng::seed_from_u64(POPULATION_SEED);

    let mut segments = Vec::with_capacity(count);
    let mut ages = Vec::with_capacity(count);
    let mut incomes = Vec::with_capacity(count);
    let mut ptypes = Vec::with_capacity(count);

    for _ in 0..count {
        if rng.gen_bool(0.7) {
            segments.push("work");
            ages.push(f64::from(rng.gen_range(18u32..70)));
            incomes.push(f64::from(rng.gen_range(15u32..250) * 1_000));
            ptypes.push(if rng.gen_bool(0.75) { "full_time" } else { "part_time" });
        } else if rng.gen_bool(0.65) {
            segments.push("school");
            ages.push(f64::from(rng.gen_range(5u32..18)));
            incomes.push(0.0);
            ptypes.push("school");
        } else {
            segments.push("school");
            ages.push(f64::from(rng.gen_range(18u32..30)));
            incomes.push(f64::from(rng.gen_range(0u32..40) * 1_000));
            ptypes.push("university");
        }
    }

    let table = AgentTableBuilder::new((0..count as u64).map(AgentId))
        .segments(segments)
        .column("age", Column::Num(ages))
        .column("income", Column::Num(incomes))
        .column("ptype", Column::categorical(ptypes))
        .chunk_size(chunk_size)
        .build()?;
    Ok(table)
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig { chunk_size: 10_000, seed: 42, ..RunConfig::default() });
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading run config {}", path.display()))?;
    let config: RunConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing run config {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    let config = load_config(config_path.as_deref())?;
    config.validate()?;

    println!("=== mandatory: tour departure and duration ===");
    println!(
        "Tours: {TOUR_COUNT}  |  Seed: {}  |  Chunk size: {}",
        config.seed, config.chunk_size
    );
    println!();

    // 1. Alternatives and specifications.
    let alternatives = load_alternatives_reader(Cursor::new(TDD_ALTS_CSV))
        .context("loading time windows")?;
    let work_spec = load_spec_reader(Cursor::new(TDD_WORK_CSV)).context("loading work spec")?;
    let school_spec =
        load_spec_reader(Cursor::new(TDD_SCHOOL_CSV)).context("loading school spec")?;
    println!(
        "Alternatives: {}  |  work terms: {}  |  school terms: {}",
        alternatives.len(),
        work_spec.len(),
        school_spec.len()
    );

    // 2. Tours.
    let mut tours = synthetic_tours(TOUR_COUNT, config.chunk_size)?;
    for segment in SEGMENTS {
        println!("  {segment:<7} tours: {}", tours.segment_rows(segment).len());
    }
    println!();

    // 3. Scheduling passes.
    let scheduler = TourScheduler::new(&alternatives, config.clone())
        .with_model("work", work_spec)?
        .with_model("school", school_spec)?;

    let t0 = Instant::now();
    let mut passes = Vec::with_capacity(SEGMENTS.len());
    for segment in SEGMENTS {
        let pass = scheduler.schedule(&mut tours, segment)?;
        println!("{} ({} tours)", pass.model, pass.summary.total);
        println!("{}", pass.summary);
        println!(
            "mean start {:.2} h, mean duration {:.2} h",
            pass.summary.mean_start(),
            pass.summary.mean_duration()
        );
        println!();
        passes.push(pass);
    }
    let elapsed = t0.elapsed();
    info!(seconds = elapsed.as_secs_f64(), "scheduling complete");

    // 4. Output.
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let mut writer = CsvWriter::new(&output_dir)?;
    write_schedule(&mut writer, &tours, scheduler.columns(), &passes)?;

    println!("Scheduled {TOUR_COUNT} tours in {:.3} s", elapsed.as_secs_f64());
    println!("  {}", output_dir.join("choices.csv").display());
    println!("  {}", output_dir.join("choice_shares.csv").display());

    Ok(())
}
