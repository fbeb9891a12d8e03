use std::collections::BTreeMap;

use geo::LineString;
use serde::{Deserialize, Serialize};

use super::SourceMetadata;
use crate::model::{
    matches::SourceId,
    reference::{OsmNodeId, WaySectionMetadata},
};

/// a contiguous sub-segment of a reference line carrying the identifiers of every
/// source whose resolved interval covers it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Partition {
    pub reference_id: String,
    pub from_intersection_id: String,
    pub to_intersection_id: String,
    /// 0-based position of this partition along the reference line.
    pub segment_index: usize,
    pub total_segments: usize,
    pub start_dist: f64,
    pub end_dist: f64,
    /// nodes at the partition's vertices, None where a synthetic vertex was inserted.
    pub node_ids: Vec<Option<OsmNodeId>>,
    pub geometry: LineString<f64>,
    pub way_section: Option<WaySectionMetadata>,
    pub sources: BTreeMap<SourceId, SourceMetadata>,
}

impl Partition {
    pub fn length(&self) -> f64 {
        self.end_dist - self.start_dist
    }

    pub fn source(&self, source: &SourceId) -> Option<&SourceMetadata> {
        self.sources.get(source)
    }

    pub fn first_node(&self) -> Option<OsmNodeId> {
        self.node_ids.first().copied().flatten()
    }

    pub fn last_node(&self) -> Option<OsmNodeId> {
        self.node_ids.last().copied().flatten()
    }
}
