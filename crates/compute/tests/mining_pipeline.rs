//! Edge list on disk -> temporal graph -> levelwise search -> ranked reports.

use std::fs;

use sdminer_compute::{report, MinerEngine};
use sdminer_core::{Itemset, MinerConfig, Strategy, Threshold};
use sdminer_graph::load_tsv;

const EPS: f64 = 1e-9;

/// Four timestamps over nodes 1..4. Timestamp 4 only carries a self-loop,
/// so every node set induces the empty signature there.
const EDGES: &str = "\
# timestamp\tnode1\tnode2
1\t1\t2
1\t2\t3
2\t1\t2
2\t3\t4
3\t2\t3
3\t1\t4
4\t4\t4
";

fn write_edges(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("edges.tsv");
    fs::write(&path, EDGES).unwrap();
    path
}

fn config(sigma: f64, maximal: bool, min_report_size: usize) -> MinerConfig {
    MinerConfig {
        threshold: Threshold::Scaled(sigma),
        strategy: Strategy::AntiMonotone,
        maximal,
        min_report_size,
        worker_threads: 2,
        ..Default::default()
    }
}

#[test]
fn loads_graph_with_empty_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_tsv(&write_edges(dir.path())).unwrap();

    let stats = graph.stats();
    assert_eq!(stats.timestamps, 4);
    assert_eq!(stats.order, 4);
    assert_eq!(stats.size, 6);
    assert_eq!(stats.min_edges, 0);
    assert_eq!(stats.max_edges, 2);
}

#[test]
fn permissive_sigma_reports_scores_for_every_large_set() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_tsv(&write_edges(dir.path())).unwrap();

    let engine = MinerEngine::new(config(1.0, false, 3)).unwrap();
    let run = engine.mine(&graph).unwrap();
    assert_eq!(run.itemsets.len(), 11);

    let rows = engine.rows(&graph, &run).unwrap();
    assert_eq!(rows.len(), 5);

    // {1,2,3}: four distinct signatures, H = 2 over 3 pairs.
    let triangle = rows.iter().find(|r| r.nodes == vec![1, 2, 3]).unwrap();
    assert!((triangle.divergence - 1.0 / 3.0).abs() < EPS);

    // {1,2,3,4}: four distinct signatures, H = 2 over 6 pairs.
    let all = rows.iter().find(|r| r.size == 4).unwrap();
    assert!((all.divergence - 4.0 / 6.0).abs() < EPS);
}

#[test]
fn zero_sigma_keeps_only_balanced_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_tsv(&write_edges(dir.path())).unwrap();

    // Only {1,2} and {2,3} are present in exactly half the timestamps.
    let engine = MinerEngine::new(config(0.0, true, 2)).unwrap();
    let run = engine.mine(&graph).unwrap();
    assert_eq!(run.itemsets, vec![Itemset::pair(1, 2), Itemset::pair(2, 3)]);

    let rows = engine.rows(&graph, &run).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.divergence.abs() < EPS));
}

#[test]
fn sweep_feeds_top_k_files() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_tsv(&write_edges(dir.path())).unwrap();

    let engine = MinerEngine::new(config(0.3, true, 2)).unwrap();
    let steps = engine.sweep(&graph, &[0.0, 1.0]).unwrap();

    let mut ranked = Vec::new();
    for step in steps {
        report::merge_distinct(&mut ranked, step.rows);
    }
    report::sort_by_divergence(&mut ranked);
    // Two pairs from sigma = 0, the full node set from sigma = 1.
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[2].nodes, vec![1, 2, 3, 4]);

    let out = dir.path().join("results");
    report::write_top_k(&out, &ranked, 3).unwrap();
    let top1 = fs::read_to_string(out.join("top-1-hyperedges.tsv")).unwrap();
    assert_eq!(top1, "2\t1\t2\t0\n");
    let top4 = fs::read_to_string(out.join("top-4-hyperedges.tsv")).unwrap();
    assert_eq!(top4.lines().count(), 3);
}

#[test]
fn strategies_agree_on_this_graph() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_tsv(&write_edges(dir.path())).unwrap();

    let am = MinerEngine::new(config(0.5, true, 2)).unwrap().mine(&graph).unwrap();
    let mut lam_config = config(0.5, true, 2);
    lam_config.strategy = Strategy::LooselyAntiMonotone;
    let lam = MinerEngine::new(lam_config).unwrap().mine(&graph).unwrap();

    // The loose strategy explores a superset of candidates.
    for itemset in &am.itemsets {
        assert!(
            lam.itemsets.iter().any(|s| itemset.is_subset_of(s)),
            "{} lost under lam",
            itemset
        );
    }
}
