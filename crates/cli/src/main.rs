//! Floating-point acceptance case table inspector.
//!
//! This binary exposes the case catalog from the command line. It provides:
//! 1. **Keys:** List every registered case table key.
//! 2. **Dump:** Generate one table and print its cases as JSON lines.
//! 3. **Interval:** Evaluate the acceptance envelope of one scalar operation.
//! 4. **Stats:** Generate every table and report cache statistics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::{Value as Json, json};
use tracing_subscriber::EnvFilter;

use fpcases_core::case::{Case, Value};
use fpcases_core::catalog::OperationKind;
use fpcases_core::interval::{EvaluationMode, Expectation, Interval};
use fpcases_core::stats::STATS_SECTIONS;
use fpcases_core::{CaseCache, Catalog, Config, IntervalEngine, Operation, Precision, Result};

#[derive(Parser, Debug)]
#[command(
    name = "fpcases",
    author,
    version,
    about = "Floating-point acceptance case tables for shader tests",
    long_about = "List, generate and inspect the acceptance envelopes a conforming shader implementation must satisfy.\n\nExamples:\n  fpcases keys --filter ceil\n  fpcases dump ceil_f32_const --limit 5\n  fpcases interval ceil f32 1.1\n  fpcases interval division f16 1 3 --const\n  fpcases stats --sections summary"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered case table keys.
    Keys {
        /// Only keys containing this substring.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Generate a case table and print its cases as JSON lines.
    Dump {
        /// Case table key (e.g. ceil_f32_non_const).
        key: String,

        /// Print at most this many cases.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the acceptance envelope of one scalar operation.
    Interval {
        /// Operation name (ceil, floor, trunc, abs, negation, addition, ...).
        operation: String,

        /// Precision (f32, f16, abstract).
        precision: String,

        /// One operand for unary operations, two for binary ones.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Evaluate as a constant expression instead of at runtime.
        #[arg(long = "const")]
        constant: bool,
    },

    /// Generate every registered table and print cache statistics.
    Stats {
        /// Report sections to print (summary, generation); all when omitted.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// Print the counters as JSON instead.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Keys { filter } => cmd_keys(config, filter.as_deref()),
        Commands::Dump { key, limit } => cmd_dump(config, &key, limit),
        Commands::Interval {
            operation,
            precision,
            values,
            constant,
        } => cmd_interval(&config, &operation, &precision, &values, constant),
        Commands::Stats { sections, json } => cmd_stats(config, &sections, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Builds the registry described by `config`.
fn build_cache(config: Config) -> Result<CaseCache> {
    let mut cache = CaseCache::new();
    let keys = Catalog::new(config).register_all(&mut cache)?;
    tracing::debug!(tables = keys.len(), "registered catalog");
    Ok(cache)
}

fn cmd_keys(config: Config, filter: Option<&str>) -> Result<()> {
    let cache = build_cache(config)?;
    for key in cache
        .keys()
        .filter(|key| filter.is_none_or(|needle| key.contains(needle)))
    {
        println!("{key}");
    }
    Ok(())
}

fn cmd_dump(config: Config, key: &str, limit: Option<usize>) -> Result<()> {
    let cache = build_cache(config)?;
    let table = cache.get(key)?;
    eprintln!(
        "[*] {key}: {} cases ({} {})",
        table.len(),
        table.precision(),
        table.mode()
    );
    for case in table.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{}", case_json(case));
    }
    Ok(())
}

/// Evaluates one operation directly through the engine, bypassing the cache.
///
/// # Arguments
///
/// * `config` - Supplies the engine policy.
/// * `operation` - Operation name.
/// * `precision` - Precision name.
/// * `values` - Operands; one for unary operations, two for binary ones.
/// * `constant` - Const evaluation instead of runtime evaluation.
fn cmd_interval(
    config: &Config,
    operation: &str,
    precision: &str,
    values: &[f64],
    constant: bool,
) -> Result<()> {
    let operation: Operation = operation.parse()?;
    let precision: Precision = precision.parse()?;
    let mode = if constant {
        EvaluationMode::Const
    } else {
        EvaluationMode::NonConst
    };
    if !Catalog::modes(precision).contains(&mode) {
        return Err(fpcases_core::Error::UnsupportedMode { precision, mode });
    }
    if !operation.supports(precision) {
        return Err(fpcases_core::Error::UnsupportedOperation {
            operation,
            precision,
        });
    }

    let engine = IntervalEngine::new(precision, mode, config.engine);
    let expected = match (operation.kind(), values) {
        (OperationKind::Unary(op), [value]) => engine.unary(op, *value),
        (OperationKind::Binary(op), [lhs, rhs]) => {
            let format = precision.format();
            Expectation::Interval(engine.binary(op, format.quantize(*lhs), format.quantize(*rhs)))
        }
        (OperationKind::Unary(_), _) => {
            eprintln!("Error: {operation} takes exactly one operand");
            process::exit(2);
        }
        (OperationKind::Binary(_), _) => {
            eprintln!("Error: {operation} takes exactly two operands");
            process::exit(2);
        }
    };

    println!("{operation} {precision} {mode}: {expected}");
    println!("{}", expectation_json(&expected));
    Ok(())
}

fn cmd_stats(config: Config, sections: &[String], as_json: bool) -> Result<()> {
    if let Some(unknown) = sections
        .iter()
        .find(|section| !STATS_SECTIONS.contains(&section.as_str()))
    {
        eprintln!(
            "Error: unknown section `{unknown}` (expected one of {})",
            STATS_SECTIONS.join(", ")
        );
        process::exit(2);
    }

    let cache = build_cache(config)?;
    let keys: Vec<String> = cache.keys().map(str::to_owned).collect();
    for key in &keys {
        let _ = cache.get(key)?;
    }
    let snapshot = cache.stats().snapshot();
    if as_json {
        println!("{}", json!(snapshot));
    } else {
        snapshot.print_sections(sections);
    }
    Ok(())
}

/// JSON number for finite values; `"inf"`, `"-inf"` or `"NaN"` otherwise.
fn float_json(value: f64) -> Json {
    if value.is_finite() {
        json!(value)
    } else {
        json!(value.to_string())
    }
}

fn value_json(value: &Value) -> Json {
    match value {
        Value::Scalar(scalar) => float_json(*scalar),
        Value::Vector(components) => components.iter().copied().map(float_json).collect(),
        Value::Matrix(matrix) => (0..matrix.cols())
            .map(|col| matrix.column(col).iter().copied().map(float_json).collect::<Json>())
            .collect(),
    }
}

fn interval_json(interval: &Interval) -> Json {
    match interval.bounds() {
        Some((low, high)) => json!({
            "low": float_json(low),
            "high": float_json(high),
            "nan": interval.accepts_nan(),
        }),
        None => json!({ "nan": true }),
    }
}

fn expectation_json(expected: &Expectation) -> Json {
    match expected {
        Expectation::Interval(interval) => interval_json(interval),
        Expectation::Vector(vector) => vector.components().iter().map(interval_json).collect(),
        Expectation::Matrix(matrix) => (0..matrix.cols())
            .map(|col| {
                (0..matrix.rows())
                    .filter_map(|row| matrix.get(col, row))
                    .map(interval_json)
                    .collect::<Json>()
            })
            .collect(),
        Expectation::BitSet(bits) => json!({
            "bits": bits.iter().map(|bits| format!("{bits:#x}")).collect::<Vec<_>>(),
        }),
    }
}

fn case_json(case: &Case) -> Json {
    json!({
        "input": case.input.iter().map(value_json).collect::<Vec<_>>(),
        "expected": expectation_json(&case.expected),
    })
}
