use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sdminer_core::{EdgeRecord, Result};
use tracing::{debug, info};

use crate::store::TemporalGraph;

/// Build a temporal graph from `timestamp<TAB>node1<TAB>node2` lines.
pub fn parse_tsv<R: BufRead>(reader: R) -> Result<TemporalGraph> {
    let mut graph = TemporalGraph::new();
    let mut records = 0usize;
    let mut self_loops = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(record) = EdgeRecord::parse_tsv_line(&line, idx + 1)? else {
            continue;
        };
        if record.is_self_loop() {
            self_loops += 1;
        }
        graph.insert_record(&record);
        records += 1;
    }

    debug!(records, self_loops, "parsed edge records");
    Ok(graph)
}

/// Load a temporal graph from a TSV file on disk.
pub fn load_tsv(path: &Path) -> Result<TemporalGraph> {
    let file = File::open(path)?;
    let graph = parse_tsv(BufReader::new(file))?;
    info!(path = %path.display(), "Loaded temporal graph: {}", graph);
    Ok(graph)
}
