use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;
use fdsm_core::errors::{ErrorInfo, FdsmError};
use fdsm_graph::BipartiteGraph;

/// Which edge-list column holds the actor set (the side projected onto).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    /// First column.
    Left,
    /// Second column.
    Right,
}

/// A bipartite graph read from an edge list, plus the label of every actor
/// in dense-ID order.
#[derive(Debug)]
pub struct EdgeList {
    pub graph: BipartiteGraph,
    pub actor_labels: Vec<String>,
}

/// Assigns dense IDs in order of first appearance and keeps the labels
/// around for write-out.
#[derive(Default)]
struct LabelMap {
    ids: HashMap<String, u32>,
    labels: Vec<String>,
}

impl LabelMap {
    fn intern(&mut self, label: &str) -> u32 {
        if let Some(id) = self.ids.get(label) {
            return *id;
        }
        let id = self.labels.len() as u32;
        self.ids.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Reads an unsigned edge list (`left right` per line, whitespace
/// separated, extra columns ignored) into a simplex graph.
pub fn read_simplex_edgelist(path: &Path, side: Side) -> Result<EdgeList, FdsmError> {
    let mut actors = LabelMap::default();
    let mut events = LabelMap::default();
    let mut adjacency: Vec<Vec<u32>> = Vec::new();

    for_each_line(path, |number, line| {
        let (actor_label, event_label, _) = split_columns(line, side, number)?;
        let actor = actors.intern(actor_label) as usize;
        let event = events.intern(event_label);
        if actor == adjacency.len() {
            adjacency.push(Vec::new());
        }
        adjacency[actor].push(event);
        Ok(())
    })?;

    let graph = BipartiteGraph::simplex(adjacency)?;
    Ok(EdgeList {
        graph,
        actor_labels: actors.labels,
    })
}

/// Reads a signed edge list (`left right weight` per line) into a duplex
/// graph, splitting edges by the sign of the weight column.
pub fn read_duplex_edgelist(path: &Path, side: Side) -> Result<EdgeList, FdsmError> {
    let mut actors = LabelMap::default();
    let mut events = LabelMap::default();
    let mut positive: Vec<Vec<u32>> = Vec::new();
    let mut negative: Vec<Vec<u32>> = Vec::new();

    for_each_line(path, |number, line| {
        let (actor_label, event_label, weight) = split_columns(line, side, number)?;
        let weight = weight.ok_or_else(|| {
            FdsmError::Io(
                ErrorInfo::new("missing-weight", "signed edge lists need a third column")
                    .with_context("line", number.to_string()),
            )
        })?;
        let weight: f64 = weight.parse().map_err(|_| {
            FdsmError::Io(
                ErrorInfo::new("bad-weight", "edge weight is not a number")
                    .with_context("line", number.to_string())
                    .with_context("value", weight.to_string()),
            )
        })?;
        let actor = actors.intern(actor_label) as usize;
        let event = events.intern(event_label);
        if actor == positive.len() {
            positive.push(Vec::new());
            negative.push(Vec::new());
        }
        if weight < 0.0 {
            negative[actor].push(event);
        } else {
            positive[actor].push(event);
        }
        Ok(())
    })?;

    let graph = BipartiteGraph::duplex(positive, negative)?;
    Ok(EdgeList {
        graph,
        actor_labels: actors.labels,
    })
}

fn for_each_line<F>(path: &Path, mut visit: F) -> Result<(), FdsmError>
where
    F: FnMut(usize, &str) -> Result<(), FdsmError>,
{
    let file = File::open(path).map_err(|error| {
        FdsmError::Io(
            ErrorInfo::new("input-open", "unable to open the input edge list")
                .with_context("path", path.display().to_string())
                .with_context("cause", error.to_string()),
        )
    })?;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|error| {
            FdsmError::Io(
                ErrorInfo::new("input-read", "unable to read the input edge list")
                    .with_context("line", (index + 1).to_string())
                    .with_context("cause", error.to_string()),
            )
        })?;
        if line.trim().is_empty() {
            continue;
        }
        visit(index + 1, &line)?;
    }
    Ok(())
}

fn split_columns(
    line: &str,
    side: Side,
    number: usize,
) -> Result<(&str, &str, Option<&str>), FdsmError> {
    let mut columns = line.split_whitespace();
    let (Some(left), Some(right)) = (columns.next(), columns.next()) else {
        return Err(FdsmError::Io(
            ErrorInfo::new("malformed-line", "edge list lines need two node columns")
                .with_context("line", number.to_string()),
        ));
    };
    let third = columns.next();
    match side {
        Side::Left => Ok((left, right, third)),
        Side::Right => Ok((right, left, third)),
    }
}
