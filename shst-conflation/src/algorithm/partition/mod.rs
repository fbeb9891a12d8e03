mod partition_ops;
mod partition_validation;
mod split_points;

pub use partition_ops::partition_reference;
pub use partition_validation::validate_partitions;
pub use split_points::split_points;
