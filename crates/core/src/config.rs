use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};
use crate::mining::{ParentBookkeeping, Strategy, Threshold};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_opt(key).and_then(|v| v.parse().ok())
}

/// Everything one mining run needs, in place of script-level globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerConfig {
    /// TSV edge list the temporal graph is built from.
    #[serde(default = "default_universe_source")]
    pub universe_source: PathBuf,
    #[serde(default)]
    pub threshold: Threshold,
    #[serde(default)]
    pub strategy: Strategy,
    /// Report only maximal itemsets.
    #[serde(default = "default_maximal")]
    pub maximal: bool,
    /// Largest itemset size to explore. `None` = unbounded.
    #[serde(default)]
    pub max_level: Option<usize>,
    /// Wall-clock budget for one search, in seconds.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
    /// Number of worker threads. 0 = available parallelism.
    #[serde(default)]
    pub worker_threads: usize,
    #[serde(default)]
    pub parent_bookkeeping: ParentBookkeeping,
    /// Itemsets smaller than this are left out of reports.
    #[serde(default = "default_min_report_size")]
    pub min_report_size: usize,
}

fn default_universe_source() -> PathBuf {
    PathBuf::from("data/edges.tsv")
}

fn default_maximal() -> bool {
    true
}

fn default_min_report_size() -> usize {
    3
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            universe_source: default_universe_source(),
            threshold: Threshold::default(),
            strategy: Strategy::default(),
            maximal: default_maximal(),
            max_level: None,
            deadline_secs: None,
            worker_threads: 0,
            parent_bookkeeping: ParentBookkeeping::default(),
            min_report_size: default_min_report_size(),
        }
    }
}

impl MinerConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// `SDMINER_PHI` takes precedence over `SDMINER_SIGMA` when both are set.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let threshold = match (env_parse::<f64>("SDMINER_PHI"), env_parse::<f64>("SDMINER_SIGMA")) {
            (Some(phi), _) => Threshold::Raw(phi),
            (None, Some(sigma)) => Threshold::Scaled(sigma),
            (None, None) => defaults.threshold,
        };

        Self {
            universe_source: env_opt("SDMINER_INPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.universe_source),
            threshold,
            strategy: env_parse("SDMINER_STRATEGY").unwrap_or(defaults.strategy),
            maximal: env_opt("SDMINER_MAXIMAL")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.maximal),
            max_level: env_parse("SDMINER_MAX_LEVEL"),
            deadline_secs: env_parse("SDMINER_DEADLINE_SECS"),
            worker_threads: env_parse("SDMINER_WORKERS").unwrap_or(defaults.worker_threads),
            parent_bookkeeping: env_parse("SDMINER_PARENTS").unwrap_or(defaults.parent_bookkeeping),
            min_report_size: env_parse("SDMINER_MIN_REPORT_SIZE")
                .unwrap_or(defaults.min_report_size),
        }
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            MinerError::Configuration(format!("{}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let value = self.threshold.value();
        if !value.is_finite() || value < 0.0 {
            return Err(MinerError::Configuration(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if let Some(max_level) = self.max_level {
            if max_level < 2 {
                return Err(MinerError::Configuration(format!(
                    "max_level must be at least 2, got {}",
                    max_level
                )));
            }
        }
        if self.deadline_secs == Some(0) {
            return Err(MinerError::Configuration(
                "deadline_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  input:       {}", self.universe_source.display());
        tracing::info!("  threshold:   {}", self.threshold);
        tracing::info!("  strategy:    {} (parents={})", self.strategy, self.parent_bookkeeping);
        tracing::info!("  maximal:     {}", self.maximal);
        tracing::info!(
            "  limits:      max_level={}, deadline={}",
            self.max_level.map_or("none".to_string(), |l| l.to_string()),
            self.deadline_secs.map_or("none".to_string(), |s| format!("{}s", s))
        );
        tracing::info!("  workers:     {}", self.resolved_worker_threads());
    }
}
