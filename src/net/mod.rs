mod load;
mod model;
mod parse;

pub use load::{SnapshotPaths, collect_overlays, collect_snapshot};
pub use model::{
    GroundTruth, HeatSample, LeakRecord, LinkRecord, Network, NodeKind, NodeRecord, OverlayData,
    Prediction, Snapshot,
};
