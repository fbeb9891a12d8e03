use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ConflationError;

/// counts of what a conflation batch did with each reference line.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ConflationSummary {
    pub references_conflated: usize,
    pub partitions_written: usize,
    pub missing_references: usize,
    pub segments_skipped: usize,
    pub intervals_dropped: usize,
    /// reference lines skipped, by failure class.
    pub failures: BTreeMap<String, usize>,
}

impl ConflationSummary {
    pub fn record_failure(&mut self, error: &ConflationError) {
        let class = match error {
            ConflationError::GeometryInconsistency { .. } => "geometry_inconsistency",
            ConflationError::TopologyAmbiguity { .. } => "topology_ambiguity",
            ConflationError::UpstreamDataDefect(_) => "upstream_data_defect",
            ConflationError::InvalidCandidateInterval { .. } => "invalid_candidate_interval",
            _ => "other",
        };
        *self.failures.entry(class.to_string()).or_default() += 1;
    }

    pub fn failure_count(&self) -> usize {
        self.failures.values().sum()
    }
}
