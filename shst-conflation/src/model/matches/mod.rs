mod candidate_interval;
mod linear_offsets;
mod match_key;
mod matched_segment;
mod source_id;

pub use candidate_interval::CandidateInterval;
pub use linear_offsets::LinearOffsets;
pub use match_key::MatchKey;
pub use matched_segment::MatchedSegment;
pub use source_id::SourceId;
