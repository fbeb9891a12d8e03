mod conflation_error;
pub mod matches;
pub mod partition;
pub mod reference;

pub use conflation_error::{ChainError, ConflationError};
