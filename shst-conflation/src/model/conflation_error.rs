use thiserror::Error;

use super::matches::SourceId;
use crate::stream::MatchStreamError;

#[derive(Error, Debug)]
pub enum ConflationError {
    #[error("invalid conflation configuration: {0}")]
    ConfigurationError(String),
    #[error("geometry of reference '{reference_id}' is inconsistent: {message}")]
    GeometryInconsistency {
        reference_id: String,
        message: String,
    },
    #[error("unable to order edges into chains: {source}")]
    TopologyAmbiguity {
        #[from]
        source: ChainError,
    },
    #[error("resolving overlaps of '{source_id}' intervals on reference '{reference_id}' left overlaps: {message}")]
    ResolverInvariantViolation {
        reference_id: String,
        source_id: SourceId,
        message: String,
    },
    #[error("partition {segment_index} of reference '{reference_id}' is claimed by more than one '{source_id}' interval ('{existing}' and '{conflicting}')")]
    PartitionConflict {
        reference_id: String,
        source_id: SourceId,
        segment_index: usize,
        existing: String,
        conflicting: String,
    },
    #[error("interval of feature '{feature_id}' on reference '{reference_id}' is invalid: {message}")]
    InvalidCandidateInterval {
        reference_id: String,
        feature_id: String,
        message: String,
    },
    #[error("malformed source record: {0}")]
    UpstreamDataDefect(String),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure reading match streams: {source}")]
    MatchStreamError {
        #[from]
        source: MatchStreamError,
    },
    #[error("{0}")]
    InternalError(String),
}

impl ConflationError {
    /// true when the error only invalidates the reference line or source feature being
    /// processed. any other error indicates a defect that must stop the batch.
    pub fn is_unit_local(&self) -> bool {
        matches!(
            self,
            ConflationError::GeometryInconsistency { .. }
                | ConflationError::TopologyAmbiguity { .. }
                | ConflationError::UpstreamDataDefect(_)
                | ConflationError::InvalidCandidateInterval { .. }
        )
    }
}

/// failures of the topological chain reconstruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("unable to determine a source edge among {0} edges")]
    NoSourceEdges(usize),
    #[error("found {found} source edges where at most {max} are allowed")]
    TooManySources { found: usize, max: usize },
    #[error("found {found} chains where at most {max} are allowed")]
    TooManyChains { found: usize, max: usize },
    #[error("directed chain covers {covered} of {total} edges")]
    IncompleteChain { covered: usize, total: usize },
}
