use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use eframe::egui::vec2;
use serde::Deserialize;
use serde_json::Value;

use super::model::{
    GroundTruth, HeatSample, LeakRecord, LinkRecord, Network, NodeKind, NodeRecord, Prediction,
};

#[derive(Clone, Debug, Deserialize)]
struct RawNetwork {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default, alias = "edges", alias = "pipes")]
    links: Vec<RawLink>,
    #[serde(default)]
    sensors: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    id: String,
    x: f64,
    y: f64,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    elevation: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawLink {
    id: String,
    #[serde(alias = "start_node")]
    start: String,
    #[serde(alias = "end_node")]
    end: String,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    diameter: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawPrediction {
    #[serde(default)]
    detected_node: String,
    #[serde(default)]
    estimated_start_time: String,
    #[serde(default)]
    estimated_cusum_severity: f64,
    #[serde(default)]
    gps_coordinates: Option<Vec<f64>>,
    #[serde(default)]
    pipe: Option<String>,
    #[serde(default)]
    heatmap: Vec<RawHeatSample>,
    #[serde(default)]
    work_order: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct RawHeatSample {
    x: f64,
    y: f64,
    weight: f64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawGroundTruth {
    #[serde(default)]
    leaks: Vec<RawLeak>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawLeak {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    pipe_id: Option<String>,
}

fn node_kind(raw: Option<&str>) -> NodeKind {
    match raw {
        Some("reservoir") => NodeKind::Reservoir,
        Some("tank") => NodeKind::Tank,
        _ => NodeKind::Junction,
    }
}

pub(super) fn parse_network(raw: &str) -> Result<Network> {
    let parsed: RawNetwork = serde_json::from_str(raw).context("invalid network JSON")?;

    let mut seen = HashSet::with_capacity(parsed.nodes.len());
    let mut duplicates = 0usize;
    let mut nodes = Vec::with_capacity(parsed.nodes.len());
    for raw_node in parsed.nodes {
        if !seen.insert(raw_node.id.clone()) {
            duplicates += 1;
            continue;
        }

        nodes.push(NodeRecord {
            pos: vec2(raw_node.x as f32, raw_node.y as f32),
            kind: node_kind(raw_node.kind.as_deref()),
            elevation: raw_node.elevation,
            id: raw_node.id,
        });
    }

    if duplicates > 0 {
        log::warn!("network snapshot contains {duplicates} duplicate node ids; keeping first");
    }

    let links = parsed
        .links
        .into_iter()
        .map(|raw_link| LinkRecord {
            id: raw_link.id,
            start: raw_link.start,
            end: raw_link.end,
            length: raw_link.length,
            diameter: raw_link.diameter,
        })
        .collect::<Vec<_>>();

    let sensor_count = parsed.sensors.len();
    let network = Network::new(nodes, links, parsed.sensors);
    if network.sensor_count() < sensor_count {
        log::warn!(
            "dropped {} sensor ids that match no network node",
            sensor_count - network.sensor_count()
        );
    }

    Ok(network)
}

pub(super) fn parse_predictions(raw: &str) -> Result<Vec<Prediction>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid predictions JSON")?;

    // Accept either a bare array or the API envelope `{ "predictions": [...] }`.
    let entries = match &parsed {
        Value::Array(_) => &parsed,
        Value::Object(object) => object
            .get("predictions")
            .ok_or_else(|| anyhow!("predictions JSON object has no `predictions` field"))?,
        _ => return Err(anyhow!("unexpected predictions JSON type")),
    };

    let raw_predictions: Vec<RawPrediction> =
        Vec::deserialize(entries).context("invalid prediction entries")?;

    Ok(raw_predictions
        .into_iter()
        .map(|raw_prediction| Prediction {
            detected_node: raw_prediction.detected_node,
            estimated_start_time: raw_prediction.estimated_start_time,
            severity: raw_prediction.estimated_cusum_severity as f32,
            gps: raw_prediction.gps_coordinates.as_deref().and_then(|gps| {
                if gps.len() >= 2 {
                    Some(vec2(gps[0] as f32, gps[1] as f32))
                } else {
                    None
                }
            }),
            pipe: raw_prediction.pipe,
            heatmap: raw_prediction
                .heatmap
                .into_iter()
                .map(|sample| HeatSample {
                    pos: vec2(sample.x as f32, sample.y as f32),
                    weight: sample.weight as f32,
                })
                .collect(),
            work_order: raw_prediction.work_order,
        })
        .collect())
}

pub(super) fn parse_ground_truth(raw: &str) -> Result<GroundTruth> {
    let parsed: RawGroundTruth = serde_json::from_str(raw).context("invalid ground-truth JSON")?;

    let leaks = parsed
        .leaks
        .into_iter()
        .map(|leak| LeakRecord {
            pos: match (leak.x, leak.y) {
                (Some(x), Some(y)) => Some(vec2(x as f32, y as f32)),
                _ => None,
            },
            pipe_id: leak.pipe_id,
        })
        .collect();

    Ok(GroundTruth { leaks })
}
