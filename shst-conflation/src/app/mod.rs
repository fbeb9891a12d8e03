mod conflation_batch;
mod conflation_ops;
mod conflation_summary;
mod partition_sink;
mod reference_provider;

pub use conflation_batch::ConflationBatch;
pub use conflation_ops::{conflate_reference, ReferenceConflation};
pub use conflation_summary::ConflationSummary;
pub use partition_sink::{CsvPartitionWriter, PartitionSink};
pub use reference_provider::ReferenceProvider;
