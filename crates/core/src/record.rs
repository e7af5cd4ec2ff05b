use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};

/// Graph node identifier.
pub type NodeId = u64;

/// Discrete snapshot index of a temporal graph.
pub type Timestamp = u64;

/// One `(timestamp, node, node)` row of an edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub timestamp: Timestamp,
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeRecord {
    pub fn new(timestamp: Timestamp, source: NodeId, target: NodeId) -> Self {
        Self {
            timestamp,
            source,
            target,
        }
    }

    /// Rows with identical endpoints declare a node rather than an edge.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Parse a tab-separated `timestamp node1 node2` line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. `line_no` is
    /// 1-based and only used for error reporting.
    pub fn parse_tsv_line(line: &str, line_no: usize) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut fields = line.split('\t').map(str::trim);
        let mut next_field = |name: &str| -> Result<u64> {
            let raw = fields.next().ok_or_else(|| MinerError::Parse {
                line: line_no,
                message: format!("missing {} column", name),
            })?;
            raw.parse::<u64>().map_err(|e| MinerError::Parse {
                line: line_no,
                message: format!("invalid {} '{}': {}", name, raw, e),
            })
        };

        let timestamp = next_field("timestamp")?;
        let source = next_field("node1")?;
        let target = next_field("node2")?;
        if let Some(extra) = fields.next() {
            return Err(MinerError::Parse {
                line: line_no,
                message: format!("unexpected column '{}' after node2", extra),
            });
        }

        Ok(Some(Self::new(timestamp, source, target)))
    }
}
