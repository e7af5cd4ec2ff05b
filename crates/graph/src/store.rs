use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use sdminer_core::{EdgeRecord, NodeId, Timestamp};

/// Undirected static graph at one timestamp.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub timestamp: Timestamp,
    edges: HashSet<(NodeId, NodeId)>,
}

impl Snapshot {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            edges: HashSet::new(),
        }
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId) {
        self.edges.insert(normalize(a, b));
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&normalize(a, b))
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(min, max)` pairs in ascending order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<_> = self.edges.iter().copied().collect();
        edges.sort_unstable();
        edges
    }
}

fn normalize(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Canonical sorted edge list of the subgraph a node set induces at one
/// timestamp. Two timestamps are structurally identical on a node set iff
/// their signatures are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Signature(Vec<(NodeId, NodeId)>);

impl Signature {
    pub fn new(edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut edges: Vec<_> = edges.into_iter().map(|(a, b)| normalize(a, b)).collect();
        edges.sort_unstable();
        edges.dedup();
        Self(edges)
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub timestamps: usize,
    pub order: usize,
    pub size: usize,
    pub min_edges: usize,
    pub max_edges: usize,
}

/// An ensemble of undirected snapshots sharing one node universe.
///
/// Every node ever mentioned belongs to every snapshot; edges come and go
/// per timestamp.
#[derive(Debug, Clone, Default)]
pub struct TemporalGraph {
    nodes: BTreeSet<NodeId>,
    snapshots: BTreeMap<Timestamp, Snapshot>,
}

impl TemporalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed edge records.
    pub fn from_records(records: impl IntoIterator<Item = EdgeRecord>) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.insert_record(&record);
        }
        graph
    }

    /// Self-loop records declare the node and the timestamp but add no edge.
    pub fn insert_record(&mut self, record: &EdgeRecord) {
        self.add_edge(record.timestamp, record.source, record.target);
    }

    /// Add an undirected edge at `timestamp`, creating the snapshot if needed.
    pub fn add_edge(&mut self, timestamp: Timestamp, a: NodeId, b: NodeId) {
        self.nodes.insert(a);
        self.nodes.insert(b);
        let snapshot = self.add_snapshot(timestamp);
        if a != b {
            snapshot.add_edge(a, b);
        }
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    /// Declare a timestamp, possibly without edges.
    pub fn add_snapshot(&mut self, timestamp: Timestamp) -> &mut Snapshot {
        self.snapshots
            .entry(timestamp)
            .or_insert_with(|| Snapshot::new(timestamp))
    }

    /// The node universe in ascending order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().copied().collect()
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges summed over all snapshots.
    pub fn size(&self) -> usize {
        self.snapshots.values().map(Snapshot::size).sum()
    }

    pub fn timestamp_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.snapshots.keys().copied().collect()
    }

    pub fn snapshot(&self, timestamp: Timestamp) -> Option<&Snapshot> {
        self.snapshots.get(&timestamp)
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.values()
    }

    /// Timestamps at which the edge `a - b` exists.
    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Vec<Timestamp> {
        self.snapshots
            .values()
            .filter(|s| s.has_edge(a, b))
            .map(|s| s.timestamp)
            .collect()
    }

    /// Fraction of timestamps at which the edge `a - b` exists.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> f64 {
        if self.snapshots.is_empty() {
            return 0.0;
        }
        self.find_edge(a, b).len() as f64 / self.snapshots.len() as f64
    }

    /// Signature of the subgraph induced by `nodes` at `timestamp`.
    ///
    /// Returns `None` for an unknown timestamp. Duplicate and unknown nodes
    /// are tolerated; unknown nodes simply have no edges.
    pub fn induced_signature(&self, nodes: &[NodeId], timestamp: Timestamp) -> Option<Signature> {
        let snapshot = self.snapshots.get(&timestamp)?;
        Some(induced(snapshot, &sorted_unique(nodes)))
    }

    /// Group all timestamps by the signature `nodes` induces at each.
    pub fn signature_distribution(&self, nodes: &[NodeId]) -> BTreeMap<Signature, Vec<Timestamp>> {
        let nodes = sorted_unique(nodes);
        let mut groups: BTreeMap<Signature, Vec<Timestamp>> = BTreeMap::new();
        for snapshot in self.snapshots.values() {
            groups
                .entry(induced(snapshot, &nodes))
                .or_default()
                .push(snapshot.timestamp);
        }
        groups
    }

    pub fn stats(&self) -> GraphStats {
        let sizes: Vec<usize> = self.snapshots.values().map(Snapshot::size).collect();
        GraphStats {
            timestamps: self.timestamp_count(),
            order: self.order(),
            size: sizes.iter().sum(),
            min_edges: sizes.iter().copied().min().unwrap_or(0),
            max_edges: sizes.iter().copied().max().unwrap_or(0),
        }
    }
}

fn sorted_unique(nodes: &[NodeId]) -> Vec<NodeId> {
    let mut nodes = nodes.to_vec();
    nodes.sort_unstable();
    nodes.dedup();
    nodes
}

/// `nodes` must be sorted and deduplicated; edges come out in canonical order.
fn induced(snapshot: &Snapshot, nodes: &[NodeId]) -> Signature {
    let mut edges = Vec::new();
    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            if snapshot.has_edge(a, b) {
                edges.push((a, b));
            }
        }
    }
    Signature(edges)
}

impl fmt::Display for TemporalGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamps: {}, Order: {}, Size: {}",
            self.timestamp_count(),
            self.order(),
            self.size()
        )
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.timestamps, self.order, self.min_edges, self.max_edges, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TemporalGraph {
        let mut g = TemporalGraph::new();
        g.add_edge(1, 1, 2);
        g.add_edge(2, 2, 1);
        g.add_edge(3, 1, 3);
        g.add_snapshot(4);
        g
    }

    #[test]
    fn edges_are_undirected() {
        let g = sample();
        assert_eq!(g.find_edge(1, 2), vec![1, 2]);
        assert_eq!(g.find_edge(2, 1), vec![1, 2]);
        assert!((g.has_edge(1, 2) - 0.5).abs() < 1e-12);
        assert_eq!(g.has_edge(2, 3), 0.0);
    }

    #[test]
    fn universe_is_shared_and_sorted() {
        let mut g = sample();
        g.add_node(0);
        assert_eq!(g.nodes(), vec![0, 1, 2, 3]);
        assert_eq!(g.order(), 4);
        assert_eq!(g.timestamp_count(), 4);
        assert_eq!(g.timestamps(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn self_loop_declares_node_and_timestamp() {
        let mut g = TemporalGraph::new();
        g.insert_record(&EdgeRecord::new(7, 9, 9));
        assert_eq!(g.nodes(), vec![9]);
        assert_eq!(g.timestamp_count(), 1);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn induced_signature_is_canonical() {
        let mut g = TemporalGraph::new();
        g.add_edge(1, 3, 1);
        g.add_edge(1, 2, 1);
        g.add_edge(1, 3, 4);

        let sig = g.induced_signature(&[3, 2, 1, 3], 1).unwrap();
        assert_eq!(sig.edges(), &[(1, 2), (1, 3)]);
        assert_eq!(sig, Signature::new([(3, 1), (2, 1)]));
        assert!(g.induced_signature(&[1, 2], 99).is_none());
    }

    #[test]
    fn distribution_counts_empty_signatures() {
        let g = sample();
        let dist = g.signature_distribution(&[1, 2, 3]);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[&Signature::new([(1, 2)])], vec![1, 2]);
        assert_eq!(dist[&Signature::new([(1, 3)])], vec![3]);
        assert_eq!(dist[&Signature::default()], vec![4]);
    }

    #[test]
    fn stats_summarize_snapshots() {
        let mut g = sample();
        g.add_edge(3, 2, 3);
        let stats = g.stats();
        assert_eq!(
            stats,
            GraphStats {
                timestamps: 4,
                order: 3,
                size: 4,
                min_edges: 0,
                max_edges: 2,
            }
        );
        assert_eq!(stats.to_string(), "4\t3\t0\t2\t4");
        assert_eq!(g.to_string(), "Timestamps: 4, Order: 3, Size: 4");
    }

    #[test]
    fn empty_graph_stats() {
        let g = TemporalGraph::new();
        assert_eq!(g.stats().max_edges, 0);
        assert_eq!(g.has_edge(1, 2), 0.0);
        assert!(g.signature_distribution(&[1, 2]).is_empty());
    }
}
