use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use fdsm_core::derive_substream_seed;
use fdsm_graph::BipartiteGraph;
use fdsm_projection::{AllStats, CoocProjection, Leverage, PValue, Pnas, WeightVariant};
use fdsm_sampler::{run, NullProgress, ProgressSink, RunConfig, RunSummary};

use crate::progress::ConsoleProgress;
use crate::reader::Side;
use crate::writer::{RunMetadata, WriteOptions};

mod progress;
mod reader;
mod writer;

#[derive(Parser, Debug)]
#[command(
    name = "fdsm",
    about = "Co-occurrence significance via fixed degree sequence sampling"
)]
struct Cli {
    /// Input edge list, whitespace separated: `left right [weight]`.
    #[arg(long = "in")]
    input: PathBuf,
    /// Output file; defaults to `<input stem>_samples<N>.txt` beside the input.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Graph type: unsigned or signed edges.
    #[arg(long = "type", value_enum, default_value_t = GraphType::Simplex)]
    graph_type: GraphType,
    /// Side of the edge list to project onto.
    #[arg(long, value_enum, default_value_t = Side::Left)]
    projection: Side,
    /// Weight variant to compute.
    #[arg(long, value_enum, default_value_t = Weight::Pvalue)]
    weight: Weight,
    /// Number of graph samples to draw.
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    /// Swap attempts per sample (0 = m ln m for m edges).
    #[arg(long, default_value_t = 0)]
    steps: usize,
    /// Worker thread count.
    #[arg(long, default_value_t = 4)]
    threads: usize,
    /// Chain seed (0 = derive from the system clock).
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Emit derived statistics instead of raw accumulators.
    #[arg(long)]
    finalize: bool,
    /// Decimal places for numeric output (min 1).
    #[arg(long, default_value_t = 8)]
    precision: usize,
    /// Write a JSON run summary to this path.
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Suppress console progress output.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphType {
    Simplex,
    Duplex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Weight {
    Pvalue,
    Lev,
    All,
    #[value(name = "PNAS", alias = "pnas")]
    Pnas,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if cli.precision == 0 {
        return Err("precision must be at least 1".into());
    }
    if cli.weight == Weight::Pnas && cli.graph_type == GraphType::Duplex {
        return Err("PNAS weights are only supported for simplex projections".into());
    }

    if !cli.quiet {
        println!("Reading data from file.");
    }
    let edge_list = match cli.graph_type {
        GraphType::Simplex => reader::read_simplex_edgelist(&cli.input, cli.projection)?,
        GraphType::Duplex => reader::read_duplex_edgelist(&cli.input, cli.projection)?,
    };
    let mut graph = edge_list.graph;

    let config = RunConfig {
        samples: cli.samples,
        steps: cli.steps,
        threads: cli.threads,
        seed: resolve_seed(cli.seed),
    }
    .resolved(graph.edge_count());

    let out_path = cli
        .out
        .clone()
        .unwrap_or_else(|| default_out_path(&cli.input, cli.samples));
    let options = WriteOptions {
        finalize: cli.finalize,
        precision: cli.precision,
    };
    let metadata = RunMetadata {
        input: cli
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        side: match cli.projection {
            Side::Left => "left",
            Side::Right => "right",
        },
        samples: config.samples,
        steps: config.steps,
        seed: config.seed,
    };

    let console = ConsoleProgress::new();
    let progress: &dyn ProgressSink = if cli.quiet { &NullProgress } else { &console };

    if !cli.quiet {
        println!(
            "Computing {} projection.",
            match cli.graph_type {
                GraphType::Simplex => "simplex",
                GraphType::Duplex => "duplex",
            }
        );
    }
    let summary = match cli.weight {
        Weight::Pvalue => execute::<PValue>(
            &mut graph,
            &edge_list.actor_labels,
            &config,
            progress,
            &out_path,
            &options,
            &metadata,
        )?,
        Weight::Lev => execute::<Leverage>(
            &mut graph,
            &edge_list.actor_labels,
            &config,
            progress,
            &out_path,
            &options,
            &metadata,
        )?,
        Weight::All => execute::<AllStats>(
            &mut graph,
            &edge_list.actor_labels,
            &config,
            progress,
            &out_path,
            &options,
            &metadata,
        )?,
        Weight::Pnas => execute::<Pnas>(
            &mut graph,
            &edge_list.actor_labels,
            &config,
            progress,
            &out_path,
            &options,
            &metadata,
        )?,
    };

    if let Some(summary_path) = &cli.summary {
        fs::write(summary_path, serde_json::to_string_pretty(&summary)?)?;
    }
    if !cli.quiet {
        println!("Results written to {}.", out_path.display());
    }
    Ok(())
}

fn execute<V: WeightVariant>(
    graph: &mut BipartiteGraph,
    labels: &[String],
    config: &RunConfig,
    progress: &dyn ProgressSink,
    out_path: &Path,
    options: &WriteOptions,
    metadata: &RunMetadata,
) -> Result<RunSummary, Box<dyn Error>> {
    let mut projection = CoocProjection::<V>::new();
    let summary = run(graph, &mut projection, config, progress)?;
    let results = projection.into_results()?;
    writer::write_results(out_path, &results, graph, labels, options, metadata)?;
    Ok(summary)
}

/// A zero seed asks for a fresh one. Hash the wall clock through the
/// substream derivation so consecutive launches land far apart even when
/// their timestamps are close.
fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(1);
    derive_substream_seed(now, 0)
}

fn default_out_path(input: &Path, samples: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("out");
    input.with_file_name(format!("{stem}_samples{samples}.txt"))
}

#[cfg(test)]
mod tests {
    use super::{default_out_path, resolve_seed};
    use std::path::Path;

    #[test]
    fn explicit_seeds_pass_through() {
        assert_eq!(resolve_seed(42), 42);
        assert_ne!(resolve_seed(0), 0);
    }

    #[test]
    fn default_output_name_derives_from_the_input() {
        assert_eq!(
            default_out_path(Path::new("/data/edges.txt"), 500),
            Path::new("/data/edges_samples500.txt")
        );
        assert_eq!(
            default_out_path(Path::new("edges"), 10),
            Path::new("edges_samples10.txt")
        );
    }
}
