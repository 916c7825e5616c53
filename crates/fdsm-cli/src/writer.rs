use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fdsm_core::errors::{ErrorInfo, FdsmError};
use fdsm_graph::{BipartiteGraph, GraphShape};
use fdsm_projection::{
    hypergeometric_similarity, ChannelKind, PairAccumulator, ProjectionResults,
};

/// Output formatting choices.
pub struct WriteOptions {
    /// Emit derived statistics instead of raw accumulators.
    pub finalize: bool,
    /// Decimal places for floating point values.
    pub precision: usize,
}

/// Run parameters echoed into the output header.
pub struct RunMetadata {
    pub input: String,
    pub side: &'static str,
    pub samples: usize,
    pub steps: usize,
    pub seed: u64,
}

/// Writes one line per tracked pair, labelled with the original actor
/// names, one block per channel. Raw output keeps the integer accumulators
/// so results from several runs can be combined later; finalized output
/// carries the derived statistics directly.
pub fn write_results(
    path: &Path,
    results: &ProjectionResults,
    graph: &BipartiteGraph,
    labels: &[String],
    options: &WriteOptions,
    metadata: &RunMetadata,
) -> Result<(), FdsmError> {
    let file = File::create(path).map_err(|error| {
        FdsmError::Io(
            ErrorInfo::new("output-create", "unable to create the output file")
                .with_context("path", path.display().to_string())
                .with_context("cause", error.to_string()),
        )
    })?;
    let mut out = BufWriter::new(file);
    render(&mut out, results, graph, labels, options, metadata)
        .map_err(|error| io_write_error(path, error))?;
    out.flush().map_err(|error| io_write_error(path, error))
}

fn io_write_error(path: &Path, error: std::io::Error) -> FdsmError {
    FdsmError::Io(
        ErrorInfo::new("output-write", "unable to write the output file")
            .with_context("path", path.display().to_string())
            .with_context("cause", error.to_string()),
    )
}

fn render<W: Write>(
    out: &mut W,
    results: &ProjectionResults,
    graph: &BipartiteGraph,
    labels: &[String],
    options: &WriteOptions,
    metadata: &RunMetadata,
) -> std::io::Result<()> {
    writeln!(
        out,
        "# fdsm weight={} projection={} samples={} steps={} seed={} finalized={} input={}",
        results.weight,
        metadata.side,
        metadata.samples,
        metadata.steps,
        metadata.seed,
        options.finalize,
        metadata.input,
    )?;
    for (channel_index, kind) in results.channel_kinds.iter().enumerate() {
        if results.channel_kinds.len() > 1 {
            writeln!(out, "# channel {}", channel_name(*kind))?;
        }
        for actor in 0..labels.len() {
            for entry in results.tracked(channel_index, actor) {
                let partner = entry.partner as usize;
                write!(out, "{} {}", labels[actor], labels[partner])?;
                write_statistics(out, results, graph, actor, entry, options, metadata)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn channel_name(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Plain => "plain",
        ChannelKind::PositivePositive => "pos-pos",
        ChannelKind::NegativeNegative => "neg-neg",
        ChannelKind::NegativePositive => "neg-pos",
    }
}

fn write_statistics<W: Write>(
    out: &mut W,
    results: &ProjectionResults,
    graph: &BipartiteGraph,
    actor: usize,
    entry: &PairAccumulator,
    options: &WriteOptions,
    metadata: &RunMetadata,
) -> std::io::Result<()> {
    let precision = options.precision;
    let samples = metadata.samples as f64;
    match results.weight.as_str() {
        "pvalue" => {
            if options.finalize {
                write!(out, " {:.precision$}", entry.ge_count as f64 / samples)
            } else {
                write!(out, " {} {}", entry.baseline, entry.ge_count)
            }
        }
        "lev" => {
            if options.finalize {
                let (mean, variance) = moments(entry, samples);
                write!(
                    out,
                    " {} {:.precision$} {:.precision$}",
                    entry.baseline, mean, variance
                )
            } else {
                write!(
                    out,
                    " {} {} {}",
                    entry.baseline, entry.cooc_sum, entry.cooc_sum_squares
                )
            }
        }
        "all" => {
            if options.finalize {
                let (mean, variance) = moments(entry, samples);
                write!(
                    out,
                    " {} {:.precision$} {:.precision$} {:.precision$}",
                    entry.baseline,
                    entry.ge_count as f64 / samples,
                    mean,
                    variance
                )
            } else {
                write!(
                    out,
                    " {} {} {} {}",
                    entry.baseline, entry.ge_count, entry.cooc_sum, entry.cooc_sum_squares
                )
            }
        }
        "PNAS" => {
            let similarity = pnas_similarity(graph, actor, entry);
            if options.finalize {
                write!(
                    out,
                    " {:.precision$} {:.precision$}",
                    similarity,
                    entry.ge_count as f64 / samples
                )
            } else {
                write!(out, " {:.precision$} {}", similarity, entry.ge_count)
            }
        }
        _ => write!(
            out,
            " {} {} {} {}",
            entry.baseline, entry.ge_count, entry.cooc_sum, entry.cooc_sum_squares
        ),
    }
}

fn moments(entry: &PairAccumulator, samples: f64) -> (f64, f64) {
    let mean = entry.cooc_sum as f64 / samples;
    let variance = entry.cooc_sum_squares as f64 / samples - mean * mean;
    (mean, variance)
}

/// Negative log hypergeometric tail of observing at least the baseline
/// co-occurrence given the two degrees. Degrees are preserved by the chain,
/// so the final graph state carries the original degree sequence.
fn pnas_similarity(graph: &BipartiteGraph, actor: usize, entry: &PairAccumulator) -> f64 {
    match graph.shape() {
        GraphShape::Simplex(simplex) => hypergeometric_similarity(
            simplex.degree(actor),
            simplex.degree(entry.partner as usize),
            entry.baseline,
            graph.event_count() as u32,
        ),
        GraphShape::Duplex(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::{write_results, RunMetadata, WriteOptions};
    use fdsm_graph::BipartiteGraph;
    use fdsm_projection::{ActorSlot, ChannelKind, PairAccumulator, ProjectionResults};

    fn toy_results(weight: &str) -> (ProjectionResults, BipartiteGraph, Vec<String>) {
        let graph =
            BipartiteGraph::simplex(vec![vec![0, 1], vec![1, 2], vec![0, 2]]).unwrap();
        let mut pair = PairAccumulator::new(1, 1);
        pair.ge_count = 3;
        pair.cooc_sum = 4;
        pair.cooc_sum_squares = 6;
        let results = ProjectionResults {
            weight: weight.to_string(),
            channel_kinds: vec![ChannelKind::Plain],
            actors: vec![
                ActorSlot {
                    channels: vec![vec![pair]],
                },
                ActorSlot {
                    channels: vec![vec![]],
                },
                ActorSlot {
                    channels: vec![vec![]],
                },
            ],
        };
        let labels = vec!["ann".to_string(), "bob".to_string(), "cat".to_string()];
        (results, graph, labels)
    }

    fn metadata() -> RunMetadata {
        RunMetadata {
            input: "edges.txt".to_string(),
            side: "left",
            samples: 4,
            steps: 10,
            seed: 1,
        }
    }

    fn written(weight: &str, finalize: bool) -> Vec<String> {
        let (results, graph, labels) = toy_results(weight);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let options = WriteOptions {
            finalize,
            precision: 2,
        };
        write_results(&path, &results, &graph, &labels, &options, &metadata()).unwrap();
        std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn raw_pvalue_output_keeps_integer_accumulators() {
        let lines = written("pvalue", false);
        assert!(lines[0].starts_with("# fdsm weight=pvalue projection=left samples=4"));
        assert_eq!(lines[1], "ann bob 1 3");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn finalized_pvalue_is_the_count_ratio() {
        let lines = written("pvalue", true);
        assert_eq!(lines[1], "ann bob 0.75");
    }

    #[test]
    fn finalized_leverage_reports_mean_and_variance() {
        let lines = written("lev", true);
        // mean = 4/4 = 1, variance = 6/4 - 1 = 0.5
        assert_eq!(lines[1], "ann bob 1 1.00 0.50");
    }

    #[test]
    fn finalized_all_combines_every_statistic() {
        let lines = written("all", true);
        assert_eq!(lines[1], "ann bob 1 0.75 1.00 0.50");
    }
}
