use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    /// the edges are the directed pieces of a single feature and must form exactly
    /// one chain using every edge.
    Directed,
    /// the edges may include reversed duplicates for two-way travel, yielding up to
    /// one chain per direction.
    Bidirectional,
}

impl ChainMode {
    pub fn max_sources(&self) -> usize {
        match self {
            ChainMode::Directed => 1,
            ChainMode::Bidirectional => 2,
        }
    }

    pub fn max_chains(&self) -> usize {
        self.max_sources()
    }
}
