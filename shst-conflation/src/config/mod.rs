pub mod constants;
mod conflation_config;
mod overlap_policy;

pub use conflation_config::ConflationConfiguration;
pub use conflation_config::LinearTolerance;
pub use overlap_policy::OverlapPolicy;
