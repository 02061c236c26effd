//! Set-associative cache simulator CLI.
//!
//! This binary replays memory access traces against a simulated cache. It performs:
//! 1. **Configuration:** Geometry and policies from flags, or a JSON `CacheConfig`.
//! 2. **Replay:** Every `R`/`W` line of the trace becomes one cache access.
//! 3. **Report:** Access, hit, miss and write-back counters as text or JSON.

mod trace;

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{
    AllocatePolicy, CacheConfig, CacheGeometry, CachePolicies, ReplacementPolicy, WritePolicy,
};
use cachesim_core::common::WORD_BYTES;
use cachesim_core::{Cache, CacheError, CacheStats, FlatMemory};

use crate::trace::{TraceError, TraceOp};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache simulator",
    long_about = "Replay a memory access trace through a simulated cache and report hit/miss statistics.\n\nTrace lines are `R <addr>` or `W <addr> <value>`; `#` starts a comment.\n\nExamples:\n  cachesim run trace.txt --size 4096 --line 64 --ways 4 --policy lru\n  cachesim run trace.txt --write-back --policy marking --seed 7\n  cachesim run trace.txt --config l1.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace file through the cache.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Trace file to replay.
    #[arg(value_name = "TRACE")]
    trace_file: PathBuf,

    /// Total cache size in bytes.
    #[arg(long, default_value_t = 4096)]
    size: usize,

    /// Line size in bytes.
    #[arg(long, default_value_t = 64)]
    line: usize,

    /// Associativity (lines per set).
    #[arg(long, default_value_t = 1)]
    ways: usize,

    /// Replacement policy.
    #[arg(long, value_enum, default_value_t = PolicyArg::Lru)]
    policy: PolicyArg,

    /// Write hits update only the line; memory is updated on eviction.
    #[arg(long)]
    write_back: bool,

    /// Write misses bypass the cache.
    #[arg(long)]
    no_allocate: bool,

    /// Log every access and eviction.
    #[arg(long)]
    trace: bool,

    /// Backing memory size in bytes.
    #[arg(long, default_value_t = 1 << 20)]
    memory: usize,

    /// Seed for the random source used by random and marking replacement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON cache configuration; replaces the geometry and policy flags.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    Random,
    Lru,
    Mru,
    Marking,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Random => Self::Random,
            PolicyArg::Lru => Self::Lru,
            PolicyArg::Mru => Self::Mru,
            PolicyArg::Marking => Self::RandomizedMarking,
        }
    }
}

/// Fatal driver errors.
#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Trace {
        path: PathBuf,
        source: TraceError,
    },
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("address {addr:#x} is outside the {memory}-byte backing memory")]
    OutOfRange { addr: u64, memory: usize },
    #[error("word at {addr:#x} crosses a {line}-byte line boundary")]
    Misaligned { addr: u64, line: usize },
    #[error("cannot encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Summary printed after a replay.
#[derive(Debug, Serialize)]
struct Report {
    size_bytes: usize,
    line_bytes: usize,
    ways: usize,
    sets: usize,
    policy_bits: u8,
    #[serde(flatten)]
    stats: CacheStats,
    hits: u64,
    hit_rate: f64,
}

impl Report {
    fn new(geometry: CacheGeometry, policies: CachePolicies, stats: CacheStats) -> Self {
        Self {
            size_bytes: geometry.capacity(),
            line_bytes: geometry.line_size,
            ways: geometry.associativity,
            sets: geometry.num_sets,
            policy_bits: policies.to_bits(),
            stats,
            hits: stats.hits(),
            hit_rate: stats.hit_rate(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Installs the log subscriber; `RUST_LOG` wins over the `--trace` default.
fn init_logging(trace: bool) {
    let default = if trace {
        "warn,cachesim_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &RunArgs) -> Result<CacheConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read(path)?;
            serde_json::from_str(&text).map_err(|source| CliError::ConfigFile {
                path: path.clone(),
                source,
            })?
        }
        None => {
            let write = if args.write_back {
                WritePolicy::WriteBack
            } else {
                WritePolicy::WriteThrough
            };
            let allocate = if args.no_allocate {
                AllocatePolicy::NoWriteAllocate
            } else {
                AllocatePolicy::WriteAllocate
            };
            CacheConfig::new(
                args.size,
                args.line,
                args.ways,
                CachePolicies::new(args.policy.into(), write, allocate),
            )
        }
    };
    config.policies.trace |= args.trace;
    Ok(config)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the configuration and trace, replays it and prints the report.
fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let config = load_config(args)?;
    init_logging(config.policies.trace);

    let ops = trace::parse(&read(&args.trace_file)?).map_err(|source| CliError::Trace {
        path: args.trace_file.clone(),
        source,
    })?;

    let report = replay(&config, &ops, args.memory, args.seed)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Cache: {} bytes, {}-byte lines, {}-way, {} sets ({:?}, {:?}, {:?})",
            report.size_bytes,
            report.line_bytes,
            report.ways,
            report.sets,
            config.policies.replacement,
            config.policies.write,
            config.policies.allocate,
        );
        println!("{}", report.stats);
    }
    Ok(())
}

/// Runs `ops` through a fresh cache over `memory` zeroed bytes and flushes it.
///
/// Every access is range-checked before it reaches the cache, so a bad
/// trace line is an error rather than a panic.
fn replay(
    config: &CacheConfig,
    ops: &[TraceOp],
    memory: usize,
    seed: u64,
) -> Result<Report, CliError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cache = Cache::new(config, FlatMemory::new(memory), move || {
        rng.random::<u64>()
    })?;
    let line = cache.geometry().line_size;

    for &op in ops {
        match op {
            TraceOp::Read(addr) => {
                check_range(addr, line, memory)?;
                let _ = cache.read(addr);
            }
            TraceOp::Write(addr, value) => {
                check_range(addr, line, memory)?;
                cache.write(addr, value);
            }
        }
    }
    cache.flush();

    Ok(Report::new(cache.geometry(), cache.policies(), cache.stats()))
}

/// Rejects accesses the cache would panic on: a word spilling into the
/// next line, or a block reaching past backing memory.
fn check_range(addr: u64, line: usize, memory: usize) -> Result<(), CliError> {
    let line = line as u64;
    if (addr & (line - 1)) + WORD_BYTES as u64 > line {
        return Err(CliError::Misaligned {
            addr,
            line: line as usize,
        });
    }
    match (addr & !(line - 1)).checked_add(line) {
        Some(end) if end <= memory as u64 => Ok(()),
        _ => Err(CliError::OutOfRange { addr, memory }),
    }
}
