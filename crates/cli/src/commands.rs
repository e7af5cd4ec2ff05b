use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use sdminer_compute::algorithms::levelwise::Truncation;
use sdminer_compute::{report, HyperedgeRow, MinerEngine};
use sdminer_core::{MinerConfig, MinerError};
use sdminer_graph::{load_tsv, TemporalGraph};
use tracing::{info, warn};

fn load_graph(config: &MinerConfig) -> Result<TemporalGraph> {
    let path = &config.universe_source;
    load_tsv(path).with_context(|| format!("failed to load temporal graph from {}", path.display()))
}

/// Log a truncated search, or refuse it under `--strict`.
fn check_truncation(truncation: Option<Truncation>, strict: bool) -> Result<()> {
    if let Some(t) = truncation {
        if strict {
            let err = MinerError::Truncated {
                level: t.level,
                reason: t.reason,
            };
            return Err(anyhow::Error::new(err).context("search did not finish"));
        }
        warn!(
            level = t.level,
            reason = %t.reason,
            "Reporting partial results; larger node sets were not explored"
        );
    }
    Ok(())
}

pub fn summary(config: &MinerConfig, json: bool) -> Result<()> {
    let graph = load_graph(config)?;
    let stats = graph.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("timestamps\torder\tmin_edges\tmax_edges\tsize");
        println!("{}", stats);
    }
    Ok(())
}

pub fn mine(config: MinerConfig, output: Option<&Path>, json: bool, strict: bool) -> Result<()> {
    config.log_summary();
    let graph = load_graph(&config)?;
    info!("{}", graph);

    let engine = MinerEngine::new(config).context("invalid miner configuration")?;
    let run = engine.mine(&graph)?;
    check_truncation(run.truncation, strict)?;

    for level in &run.levels {
        info!(
            level = level.level,
            accepted = level.accepted,
            parents_deleted = level.parents_deleted,
            "Level finished in {:.3}s",
            level.elapsed.as_secs_f64()
        );
    }

    let rows = engine.rows(&graph, &run)?;
    match output {
        Some(path) => {
            write_rows(&mut BufWriter::new(fs::File::create(path)?), &rows, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = rows.len(), "Report written");
        }
        None => write_rows(&mut io::stdout().lock(), &rows, json)?,
    }
    Ok(())
}

fn write_rows<W: Write>(writer: &mut W, rows: &[HyperedgeRow], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, rows)?;
        writeln!(writer)?;
        writer.flush()?;
    } else {
        report::write_tsv(writer, rows)?;
    }
    Ok(())
}

/// Mine every sigma in turn, keeping per-sigma files and refreshing the
/// cumulative top-k ranking after each step.
pub fn sweep(
    config: MinerConfig,
    sigmas: &[f64],
    out_dir: &Path,
    top_k_exp: u32,
    strict: bool,
) -> Result<()> {
    if sigmas.is_empty() {
        bail!("sweep needs at least one sigma");
    }
    config.log_summary();
    let graph = load_graph(&config)?;
    info!("{}", graph);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let stem = config
        .universe_source
        .file_stem()
        .map_or_else(|| "graph".to_string(), |s| s.to_string_lossy().into_owned());
    fs::write(out_dir.join(format!("{}.summary", stem)), format!("{}\n", graph.stats()))?;

    let engine = MinerEngine::new(config).context("invalid miner configuration")?;
    let mut ranked: Vec<HyperedgeRow> = Vec::new();
    for &sigma in sigmas {
        let step = engine
            .sweep(&graph, &[sigma])?
            .pop()
            .context("sweep produced no result")?;
        check_truncation(step.truncation, strict)
            .with_context(|| format!("sweep stopped at sigma={}", sigma))?;

        let path = out_dir.join(format!("hyperedges-sigma-{}.tsv", sigma));
        report::write_tsv_file(&path, &step.rows)?;
        info!(sigma, rows = step.rows.len(), path = %path.display(), "Wrote sigma report");

        report::merge_distinct(&mut ranked, step.rows);
        report::sort_by_divergence(&mut ranked);
        report::write_top_k(out_dir, &ranked, top_k_exp)?;
    }

    info!(total = ranked.len(), "Sweep complete");
    Ok(())
}
