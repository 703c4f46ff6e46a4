use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Junction,
    Reservoir,
    Tank,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Junction => "junction",
            Self::Reservoir => "reservoir",
            Self::Tank => "tank",
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub pos: Vec2,
    pub kind: NodeKind,
    pub elevation: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct LinkRecord {
    pub id: String,
    pub start: String,
    pub end: String,
    pub length: Option<f64>,
    pub diameter: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Network {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
    index_by_id: HashMap<String, usize>,
    sensor_ids: HashSet<String>,
}

impl Network {
    pub fn new(nodes: Vec<NodeRecord>, links: Vec<LinkRecord>, sensors: Vec<String>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.clone()).or_insert(index);
        }

        let sensor_ids = sensors
            .into_iter()
            .filter(|id| index_by_id.contains_key(id))
            .collect::<HashSet<_>>();

        Self {
            nodes,
            links,
            index_by_id,
            sensor_ids,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensor_ids.len()
    }

    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn is_sensor(&self, id: &str) -> bool {
        self.sensor_ids.contains(id)
    }

    pub fn sensor_indices(&self) -> Vec<usize> {
        let mut indices = self
            .sensor_ids
            .iter()
            .filter_map(|id| self.node_index(id))
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    pub fn link_midpoint(&self, link_id: &str) -> Option<Vec2> {
        let link = self.links.iter().find(|link| link.id == link_id)?;
        let start = self.node(&link.start)?;
        let end = self.node(&link.end)?;
        Some((start.pos + end.pos) * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatSample {
    pub pos: Vec2,
    pub weight: f32,
}

#[derive(Clone, Debug)]
pub struct Prediction {
    pub detected_node: String,
    pub estimated_start_time: String,
    pub severity: f32,
    pub gps: Option<Vec2>,
    pub pipe: Option<String>,
    pub heatmap: Vec<HeatSample>,
    pub work_order: Option<String>,
}

impl Prediction {
    pub fn location(&self, network: &Network) -> Option<Vec2> {
        self.gps
            .or_else(|| network.node(&self.detected_node).map(|node| node.pos))
    }
}

#[derive(Clone, Debug)]
pub struct LeakRecord {
    pub pos: Option<Vec2>,
    pub pipe_id: Option<String>,
}

impl LeakRecord {
    pub fn resolved_pos(&self, network: &Network) -> Option<Vec2> {
        self.pos.or_else(|| {
            self.pipe_id
                .as_deref()
                .and_then(|pipe| network.link_midpoint(pipe))
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct GroundTruth {
    pub leaks: Vec<LeakRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct OverlayData {
    pub predictions: Vec<Prediction>,
    pub ground_truth: Option<GroundTruth>,
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub network: Network,
    pub overlays: OverlayData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn node(id: &str, x: f32, y: f32) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            pos: vec2(x, y),
            kind: NodeKind::Junction,
            elevation: None,
        }
    }

    #[test]
    fn unknown_sensors_are_dropped() {
        let network = Network::new(
            vec![node("n1", 0.0, 0.0), node("n2", 10.0, 0.0)],
            Vec::new(),
            vec!["n2".to_owned(), "ghost".to_owned()],
        );

        assert_eq!(network.sensor_count(), 1);
        assert!(network.is_sensor("n2"));
        assert!(!network.is_sensor("ghost"));
    }

    #[test]
    fn link_midpoint_requires_both_endpoints() {
        let network = Network::new(
            vec![node("n1", 0.0, 0.0), node("n2", 10.0, 4.0)],
            vec![
                LinkRecord {
                    id: "p1".to_owned(),
                    start: "n1".to_owned(),
                    end: "n2".to_owned(),
                    length: None,
                    diameter: None,
                },
                LinkRecord {
                    id: "p2".to_owned(),
                    start: "n1".to_owned(),
                    end: "missing".to_owned(),
                    length: None,
                    diameter: None,
                },
            ],
            Vec::new(),
        );

        assert_eq!(network.link_midpoint("p1"), Some(vec2(5.0, 2.0)));
        assert_eq!(network.link_midpoint("p2"), None);
        assert_eq!(network.link_midpoint("p9"), None);
    }

    #[test]
    fn prediction_location_prefers_gps() {
        let network = Network::new(vec![node("n1", 3.0, 4.0)], Vec::new(), Vec::new());
        let mut prediction = Prediction {
            detected_node: "n1".to_owned(),
            estimated_start_time: String::new(),
            severity: 1.0,
            gps: Some(vec2(8.0, 9.0)),
            pipe: None,
            heatmap: Vec::new(),
            work_order: None,
        };

        assert_eq!(prediction.location(&network), Some(vec2(8.0, 9.0)));

        prediction.gps = None;
        assert_eq!(prediction.location(&network), Some(vec2(3.0, 4.0)));

        prediction.detected_node = "missing".to_owned();
        assert_eq!(prediction.location(&network), None);
    }
}
