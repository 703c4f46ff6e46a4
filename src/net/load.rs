use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{OverlayData, Snapshot};
use super::parse::{parse_ground_truth, parse_network, parse_predictions};

#[derive(Clone, Debug)]
pub struct SnapshotPaths {
    pub network: String,
    pub predictions: Option<String>,
    pub ground_truth: Option<String>,
}

fn read_snapshot_file(path: &str) -> Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("failed to read {path}"))
}

pub fn collect_snapshot(paths: &SnapshotPaths) -> Result<Snapshot> {
    let raw_network = read_snapshot_file(&paths.network)?;
    let network = parse_network(&raw_network)
        .with_context(|| format!("failed to parse network snapshot {}", paths.network))?;

    let overlays = collect_overlays(paths)?;

    log::info!(
        "loaded network snapshot: {} nodes, {} links, {} sensors, {} predictions",
        network.node_count(),
        network.link_count(),
        network.sensor_count(),
        overlays.predictions.len(),
    );

    Ok(Snapshot { network, overlays })
}

pub fn collect_overlays(paths: &SnapshotPaths) -> Result<OverlayData> {
    let predictions = match &paths.predictions {
        Some(path) => {
            let raw = read_snapshot_file(path)?;
            parse_predictions(&raw)
                .with_context(|| format!("failed to parse prediction snapshot {path}"))?
        }
        None => Vec::new(),
    };

    let ground_truth = match &paths.ground_truth {
        Some(path) => {
            let raw = read_snapshot_file(path)?;
            Some(
                parse_ground_truth(&raw)
                    .with_context(|| format!("failed to parse ground-truth snapshot {path}"))?,
            )
        }
        None => None,
    };

    Ok(OverlayData {
        predictions,
        ground_truth,
    })
}
