//! k-way merge of per-source match streams, each sorted by reference id, into one
//! group of matches per reference line.
mod aggregated_matches;
mod match_aggregator;
mod match_record;
mod match_stream_error;

pub use aggregated_matches::AggregatedReferenceMatches;
pub use match_aggregator::{MatchAggregator, MatchSource};
pub use match_record::MatchRecord;
pub use match_stream_error::MatchStreamError;
