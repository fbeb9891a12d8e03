mod reference_partition;
mod source_metadata;

pub use reference_partition::Partition;
pub use source_metadata::SourceMetadata;
