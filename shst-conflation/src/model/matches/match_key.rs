use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::SourceId;
use crate::model::ConflationError;

const KEY_SEPARATOR: &str = "##";

/// staging key of a single matched segment, `{reference_id}##{segment_index}##{data_source_id}`.
/// keys sort by reference id first, which is the order the match aggregator requires.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    pub reference_id: String,
    pub segment_index: usize,
    pub data_source_id: SourceId,
}

impl FromStr for MatchKey {
    type Err = ConflationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        match parts.as_slice() {
            [reference_id, segment_index, data_source_id]
                if !reference_id.is_empty() && !data_source_id.is_empty() =>
            {
                let segment_index = segment_index.parse::<usize>().map_err(|e| {
                    ConflationError::UpstreamDataDefect(format!(
                        "match key '{s}' has invalid segment index: {e}"
                    ))
                })?;
                Ok(MatchKey {
                    reference_id: reference_id.to_string(),
                    segment_index,
                    data_source_id: SourceId::from(*data_source_id),
                })
            }
            _ => Err(ConflationError::UpstreamDataDefect(format!(
                "malformed match key '{s}'"
            ))),
        }
    }
}

impl Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.reference_id, self.segment_index, self.data_source_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key: MatchKey = "a1b2##3##inrix".parse().unwrap();
        assert_eq!(key.reference_id, "a1b2");
        assert_eq!(key.segment_index, 3);
        assert_eq!(key.data_source_id, SourceId::from("inrix"));
        assert_eq!(key.to_string(), "a1b2##3##inrix");
    }

    #[test]
    fn test_malformed_keys() {
        for s in ["a1b2##3", "a1b2##x##inrix", "##0##inrix", "a##1##b##c"] {
            let result = s.parse::<MatchKey>();
            assert!(
                matches!(result, Err(ConflationError::UpstreamDataDefect(_))),
                "{s} should be rejected"
            );
        }
    }
}
