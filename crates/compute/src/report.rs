use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use sdminer_core::{Itemset, NodeId, Result};
use tracing::info;

use crate::algorithms::divergence::DivergenceOracle;

/// One reported node set with its scaled divergence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperedgeRow {
    pub size: usize,
    pub nodes: Vec<NodeId>,
    pub divergence: f64,
}

impl HyperedgeRow {
    /// `size<TAB>node...<TAB>divergence`
    pub fn to_tsv_line(&self) -> String {
        let mut fields = Vec::with_capacity(self.nodes.len() + 2);
        fields.push(self.size.to_string());
        fields.extend(self.nodes.iter().map(NodeId::to_string));
        fields.push(self.divergence.to_string());
        fields.join("\t")
    }
}

/// Score itemsets of at least `min_size` nodes, ordered by size then nodes.
pub fn hyperedge_rows(
    itemsets: &[Itemset<NodeId>],
    oracle: &DivergenceOracle<'_>,
    min_size: usize,
) -> Result<Vec<HyperedgeRow>> {
    let min_size = min_size.max(2);
    let mut rows: Vec<HyperedgeRow> = itemsets
        .par_iter()
        .filter(|itemset| itemset.len() >= min_size)
        .map(|itemset| -> Result<HyperedgeRow> {
            Ok(HyperedgeRow {
                size: itemset.len(),
                nodes: itemset.items().to_vec(),
                divergence: oracle.scaled_divergence(itemset)?,
            })
        })
        .collect::<Result<_>>()?;

    rows.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.nodes.cmp(&b.nodes)));
    Ok(rows)
}

/// Most stable first; ties by size then nodes.
pub fn sort_by_divergence(rows: &mut [HyperedgeRow]) {
    rows.sort_by(|a, b| {
        a.divergence
            .total_cmp(&b.divergence)
            .then_with(|| a.size.cmp(&b.size))
            .then_with(|| a.nodes.cmp(&b.nodes))
    });
}

/// Append rows whose node sets are not already present.
pub fn merge_distinct(acc: &mut Vec<HyperedgeRow>, rows: impl IntoIterator<Item = HyperedgeRow>) {
    let mut seen: HashSet<Vec<NodeId>> = acc.iter().map(|r| r.nodes.clone()).collect();
    for row in rows {
        if seen.insert(row.nodes.clone()) {
            acc.push(row);
        }
    }
}

pub fn write_tsv<W: Write>(mut writer: W, rows: &[HyperedgeRow]) -> io::Result<()> {
    for row in rows {
        writeln!(writer, "{}", row.to_tsv_line())?;
    }
    writer.flush()
}

pub fn write_tsv_file(path: &Path, rows: &[HyperedgeRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_tsv(BufWriter::new(File::create(path)?), rows)?;
    Ok(())
}

/// Write `top-{k}-hyperedges.tsv` for `k = 1, 2, 4, .., 2^(exponents-1)`.
///
/// `rows` must already be in ranking order.
pub fn write_top_k(dir: &Path, rows: &[HyperedgeRow], exponents: u32) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for exp in 0..exponents {
        let k = 1usize << exp;
        let path = dir.join(format!("top-{}-hyperedges.tsv", k));
        write_tsv_file(&path, &rows[..k.min(rows.len())])?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "Updated top-k hyperedge files");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdminer_graph::TemporalGraph;

    fn row(nodes: &[NodeId], divergence: f64) -> HyperedgeRow {
        HyperedgeRow {
            size: nodes.len(),
            nodes: nodes.to_vec(),
            divergence,
        }
    }

    #[test]
    fn rows_skip_small_itemsets_and_sort() {
        let mut g = TemporalGraph::new();
        g.add_edge(1, 1, 2);
        g.add_edge(1, 2, 3);
        g.add_edge(2, 1, 2);
        g.add_edge(2, 3, 4);
        let oracle = DivergenceOracle::new(&g).unwrap();

        let itemsets = vec![
            Itemset::new([2, 3, 4]),
            Itemset::new([1, 2]),
            Itemset::new([1, 2, 3]),
        ];
        let rows = hyperedge_rows(&itemsets, &oracle, 3).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nodes, vec![1, 2, 3]);
        assert_eq!(rows[1].nodes, vec![2, 3, 4]);
        assert!(rows.iter().all(|r| r.divergence <= 1.0));

        let with_pairs = hyperedge_rows(&itemsets, &oracle, 0).unwrap();
        assert_eq!(with_pairs[0].nodes, vec![1, 2]);
    }

    #[test]
    fn tsv_line_format() {
        assert_eq!(row(&[4, 9, 11], 0.25).to_tsv_line(), "3\t4\t9\t11\t0.25");

        let mut buf = Vec::new();
        write_tsv(&mut buf, &[row(&[1, 2, 3], 0.5), row(&[5, 6, 7], 1.0)]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3\t1\t2\t3\t0.5\n3\t5\t6\t7\t1\n");
    }

    #[test]
    fn divergence_ordering_and_merge() {
        let mut acc = vec![row(&[1, 2, 3], 0.4)];
        merge_distinct(&mut acc, vec![row(&[1, 2, 3], 0.4), row(&[2, 3, 4], 0.1), row(&[1, 2, 3, 4], 0.1)]);
        assert_eq!(acc.len(), 3);

        sort_by_divergence(&mut acc);
        let order: Vec<_> = acc.iter().map(|r| r.nodes.clone()).collect();
        assert_eq!(order, vec![vec![2, 3, 4], vec![1, 2, 3, 4], vec![1, 2, 3]]);
    }

    #[test]
    fn top_k_files_are_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row(&[1, 2, 3], 0.1), row(&[2, 3, 4], 0.2), row(&[3, 4, 5], 0.3)];

        let written = write_top_k(dir.path(), &rows, 3).unwrap();
        assert_eq!(written.len(), 3);

        let top2 = std::fs::read_to_string(dir.path().join("top-2-hyperedges.tsv")).unwrap();
        assert_eq!(top2.lines().count(), 2);
        let top4 = std::fs::read_to_string(dir.path().join("top-4-hyperedges.tsv")).unwrap();
        assert_eq!(top4.lines().count(), 3);
    }

    #[test]
    fn rows_serialize_to_json() {
        let json = serde_json::to_value(row(&[1, 2, 3], 0.5)).unwrap();
        assert_eq!(json["size"], 3);
        assert_eq!(json["nodes"], serde_json::json!([1, 2, 3]));
    }
}
