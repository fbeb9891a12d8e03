use std::collections::HashMap;

use crate::model::{reference::ReferenceLine, ConflationError};

/// looks up the reference lines that matches were aligned to.
pub trait ReferenceProvider: Sync {
    /// the reference line with this id, or None if the network does not contain it.
    fn get_reference(&self, reference_id: &str) -> Result<Option<ReferenceLine>, ConflationError>;
}

impl ReferenceProvider for HashMap<String, ReferenceLine> {
    fn get_reference(&self, reference_id: &str) -> Result<Option<ReferenceLine>, ConflationError> {
        Ok(self.get(reference_id).cloned())
    }
}
