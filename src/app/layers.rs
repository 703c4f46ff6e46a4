use eframe::egui::Vec2;

use crate::net::{GroundTruth, Network, NodeKind, Prediction};

use super::heat::{self, HeatEncoding, HeatOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct LayerFlags {
    pub show_sensors: bool,
    pub show_ground_truth: bool,
    pub show_predictions: bool,
    pub show_heatmap: bool,
    pub show_error_lines: bool,
}

impl Default for LayerFlags {
    fn default() -> Self {
        Self {
            show_sensors: true,
            show_ground_truth: true,
            show_predictions: true,
            show_heatmap: true,
            show_error_lines: true,
        }
    }
}

/// World-space primitives in fixed back-to-front order. The paint adapter
/// walks the list as-is, so list order is draw order.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum DrawPrimitive {
    LinkBatch { segments: Vec<(Vec2, Vec2)> },
    Node { index: usize, pos: Vec2, kind: NodeKind },
    Sensor { index: usize, pos: Vec2 },
    TruthMarker { pos: Vec2 },
    HeatPoint { pos: Vec2, encoding: HeatEncoding },
    PredictionMarker { index: usize, pos: Vec2, severity: f32 },
    ErrorLine { from: Vec2, to: Vec2 },
}

pub(in crate::app) fn build_layers(
    network: &Network,
    predictions: &[Prediction],
    ground_truth: Option<&GroundTruth>,
    flags: LayerFlags,
    heat: HeatOptions,
) -> Vec<DrawPrimitive> {
    let mut primitives = Vec::new();

    let mut segments = Vec::with_capacity(network.links.len());
    let mut dropped_links = 0usize;
    for link in &network.links {
        let (Some(start), Some(end)) = (network.node(&link.start), network.node(&link.end)) else {
            dropped_links += 1;
            continue;
        };
        segments.push((start.pos, end.pos));
    }
    if dropped_links > 0 {
        log::debug!("dropped {dropped_links} links with unresolved endpoints");
    }
    primitives.push(DrawPrimitive::LinkBatch { segments });

    for (index, node) in network.nodes.iter().enumerate() {
        primitives.push(DrawPrimitive::Node {
            index,
            pos: node.pos,
            kind: node.kind,
        });
    }

    if flags.show_sensors {
        for index in network.sensor_indices() {
            primitives.push(DrawPrimitive::Sensor {
                index,
                pos: network.nodes[index].pos,
            });
        }
    }

    if flags.show_ground_truth && let Some(truth) = ground_truth {
        for leak in &truth.leaks {
            if let Some(pos) = leak.resolved_pos(network) {
                primitives.push(DrawPrimitive::TruthMarker { pos });
            }
        }
    }

    if flags.show_predictions {
        if flags.show_heatmap {
            for prediction in predictions {
                for sample in &prediction.heatmap {
                    primitives.push(DrawPrimitive::HeatPoint {
                        pos: sample.pos,
                        encoding: heat::encode(sample.weight, heat),
                    });
                }
            }
        }

        for (index, prediction) in predictions.iter().enumerate() {
            if let Some(pos) = prediction.location(network) {
                primitives.push(DrawPrimitive::PredictionMarker {
                    index,
                    pos,
                    severity: prediction.severity,
                });
            }
        }

        if flags.show_error_lines
            && flags.show_ground_truth
            && let Some(truth) = ground_truth
        {
            for prediction in predictions {
                let Some(from) = prediction.location(network) else {
                    continue;
                };
                if let Some(to) = truth_anchor(prediction, from, network, truth) {
                    primitives.push(DrawPrimitive::ErrorLine { from, to });
                }
            }
        }
    }

    primitives
}

/// Ground-truth position a prediction is measured against: the leak on the
/// same pipe when both sides name one, else the nearest resolved leak.
fn truth_anchor(
    prediction: &Prediction,
    prediction_pos: Vec2,
    network: &Network,
    truth: &GroundTruth,
) -> Option<Vec2> {
    if let Some(pipe) = prediction.pipe.as_deref() {
        for leak in &truth.leaks {
            if leak.pipe_id.as_deref() == Some(pipe)
                && let Some(pos) = leak.resolved_pos(network)
            {
                return Some(pos);
            }
        }
    }

    truth
        .leaks
        .iter()
        .filter_map(|leak| leak.resolved_pos(network))
        .min_by(|a, b| {
            (*a - prediction_pos)
                .length_sq()
                .total_cmp(&(*b - prediction_pos).length_sq())
        })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ErrorSummary {
    pub mean: f32,
    pub max: f32,
    pub pairs: usize,
}

pub(in crate::app) fn error_summary(
    network: &Network,
    predictions: &[Prediction],
    ground_truth: Option<&GroundTruth>,
) -> Option<ErrorSummary> {
    let truth = ground_truth?;

    let mut total = 0.0f32;
    let mut max = 0.0f32;
    let mut pairs = 0usize;

    for prediction in predictions {
        let Some(from) = prediction.location(network) else {
            continue;
        };
        let Some(to) = truth_anchor(prediction, from, network, truth) else {
            continue;
        };

        let error = (to - from).length();
        total += error;
        max = max.max(error);
        pairs += 1;
    }

    if pairs == 0 {
        return None;
    }

    Some(ErrorSummary {
        mean: total / pairs as f32,
        max,
        pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{HeatSample, LeakRecord, LinkRecord, NodeRecord};
    use eframe::egui::vec2;

    fn node(id: &str, x: f32, y: f32) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            pos: vec2(x, y),
            kind: NodeKind::Junction,
            elevation: None,
        }
    }

    fn link(id: &str, start: &str, end: &str) -> LinkRecord {
        LinkRecord {
            id: id.to_owned(),
            start: start.to_owned(),
            end: end.to_owned(),
            length: None,
            diameter: None,
        }
    }

    fn prediction(detected: &str, gps: Option<Vec2>, heatmap: Vec<HeatSample>) -> Prediction {
        Prediction {
            detected_node: detected.to_owned(),
            estimated_start_time: "2019-02-11T04:35:00".to_owned(),
            severity: 2.0,
            gps,
            pipe: None,
            heatmap,
            work_order: None,
        }
    }

    fn layer_rank(primitive: &DrawPrimitive) -> u8 {
        match primitive {
            DrawPrimitive::LinkBatch { .. } => 0,
            DrawPrimitive::Node { .. } => 1,
            DrawPrimitive::Sensor { .. } => 2,
            DrawPrimitive::TruthMarker { .. } => 3,
            DrawPrimitive::HeatPoint { .. } => 4,
            DrawPrimitive::PredictionMarker { .. } => 5,
            DrawPrimitive::ErrorLine { .. } => 6,
        }
    }

    fn sample_network() -> Network {
        Network::new(
            vec![node("n1", 0.0, 0.0), node("n2", 10.0, 10.0), node("n3", 10.0, 0.0)],
            vec![link("p1", "n1", "n2"), link("p2", "n2", "ghost")],
            vec!["n3".to_owned()],
        )
    }

    #[test]
    fn layers_come_out_in_painter_order() {
        let network = sample_network();
        let predictions = vec![prediction(
            "n2",
            Some(vec2(9.0, 9.0)),
            vec![HeatSample {
                pos: vec2(8.0, 8.0),
                weight: 0.7,
            }],
        )];
        let truth = GroundTruth {
            leaks: vec![LeakRecord {
                pos: Some(vec2(10.0, 9.0)),
                pipe_id: None,
            }],
        };

        let primitives = build_layers(
            &network,
            &predictions,
            Some(&truth),
            LayerFlags::default(),
            HeatOptions::default(),
        );

        let ranks = primitives.iter().map(layer_rank).collect::<Vec<_>>();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(ranks, vec![0, 1, 1, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unresolved_links_are_dropped_silently() {
        let primitives = build_layers(
            &sample_network(),
            &[],
            None,
            LayerFlags::default(),
            HeatOptions::default(),
        );

        let DrawPrimitive::LinkBatch { segments } = &primitives[0] else {
            panic!("first primitive must be the link batch");
        };
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], (vec2(0.0, 0.0), vec2(10.0, 10.0)));
    }

    #[test]
    fn empty_network_yields_only_an_empty_link_batch() {
        let network = Network::new(Vec::new(), Vec::new(), Vec::new());
        let primitives = build_layers(
            &network,
            &[],
            None,
            LayerFlags::default(),
            HeatOptions::default(),
        );

        assert_eq!(
            primitives,
            vec![DrawPrimitive::LinkBatch {
                segments: Vec::new()
            }]
        );
    }

    #[test]
    fn visibility_flags_gate_overlay_layers() {
        let network = sample_network();
        let predictions = vec![prediction(
            "n2",
            None,
            vec![HeatSample {
                pos: vec2(1.0, 1.0),
                weight: 0.5,
            }],
        )];
        let truth = GroundTruth {
            leaks: vec![LeakRecord {
                pos: Some(vec2(2.0, 2.0)),
                pipe_id: None,
            }],
        };

        let flags = LayerFlags {
            show_sensors: false,
            show_ground_truth: false,
            show_predictions: false,
            show_heatmap: true,
            show_error_lines: true,
        };
        let primitives = build_layers(
            &network,
            &predictions,
            Some(&truth),
            flags,
            HeatOptions::default(),
        );

        assert!(primitives.iter().all(|primitive| {
            matches!(
                primitive,
                DrawPrimitive::LinkBatch { .. } | DrawPrimitive::Node { .. }
            )
        }));
    }

    #[test]
    fn heat_points_encode_their_sample_weight() {
        let network = sample_network();
        let heat = HeatOptions::default();
        let predictions = vec![prediction(
            "n2",
            None,
            vec![
                HeatSample {
                    pos: vec2(1.0, 1.0),
                    weight: 0.1,
                },
                HeatSample {
                    pos: vec2(1.0, 1.0),
                    weight: 0.9,
                },
            ],
        )];

        let primitives = build_layers(&network, &predictions, None, LayerFlags::default(), heat);
        let encodings = primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::HeatPoint { encoding, .. } => Some(*encoding),
                _ => None,
            })
            .collect::<Vec<_>>();

        assert_eq!(encodings.len(), 2);
        assert!(encodings[1].radius > encodings[0].radius);
        assert!(encodings[1].opacity > encodings[0].opacity);
    }

    #[test]
    fn error_lines_pair_by_pipe_before_distance() {
        let network = sample_network();
        let mut by_pipe = prediction("n1", None, Vec::new());
        by_pipe.pipe = Some("p1".to_owned());

        let truth = GroundTruth {
            leaks: vec![
                // Nearest to n1, but on a different pipe.
                LeakRecord {
                    pos: Some(vec2(0.5, 0.5)),
                    pipe_id: Some("p9".to_owned()),
                },
                LeakRecord {
                    pos: None,
                    pipe_id: Some("p1".to_owned()),
                },
            ],
        };

        let primitives = build_layers(
            &network,
            &[by_pipe],
            Some(&truth),
            LayerFlags::default(),
            HeatOptions::default(),
        );

        let lines = primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::ErrorLine { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect::<Vec<_>>();

        // p1 midpoint is (5, 5).
        assert_eq!(lines, vec![(vec2(0.0, 0.0), vec2(5.0, 5.0))]);
    }

    #[test]
    fn error_summary_reports_mean_and_max() {
        let network = sample_network();
        let predictions = vec![
            prediction("n1", Some(vec2(0.0, 0.0)), Vec::new()),
            prediction("n2", Some(vec2(10.0, 10.0)), Vec::new()),
        ];
        let truth = GroundTruth {
            leaks: vec![
                LeakRecord {
                    pos: Some(vec2(3.0, 4.0)),
                    pipe_id: None,
                },
                LeakRecord {
                    pos: Some(vec2(10.0, 10.0)),
                    pipe_id: None,
                },
            ],
        };

        let summary = error_summary(&network, &predictions, Some(&truth)).unwrap();
        assert_eq!(summary.pairs, 2);
        assert!((summary.max - 5.0).abs() < 1e-5);
        assert!((summary.mean - 2.5).abs() < 1e-5);

        assert_eq!(error_summary(&network, &predictions, None), None);
        assert_eq!(error_summary(&network, &[], Some(&truth)), None);
    }
}
