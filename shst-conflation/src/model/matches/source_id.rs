use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::config::constants::OSM_SOURCE;

/// name of a target map (dataset) being conflated onto the reference network.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SourceId(pub String);

impl SourceId {
    /// the reserved source describing the OSM ways beneath each reference line.
    pub fn osm() -> SourceId {
        SourceId(String::from(OSM_SOURCE))
    }

    pub fn is_osm(&self) -> bool {
        self.0 == OSM_SOURCE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        SourceId(value.to_string())
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
