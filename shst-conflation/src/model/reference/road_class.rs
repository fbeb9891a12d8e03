use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// SharedStreets road classification of an OSM way. the declaration order is the
/// network hierarchy: lower rank takes priority when way sections overlap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Service,
    #[default]
    #[serde(other)]
    Other,
}

impl RoadClass {
    pub fn rank(&self) -> i64 {
        match self {
            RoadClass::Motorway => 0,
            RoadClass::Trunk => 1,
            RoadClass::Primary => 2,
            RoadClass::Secondary => 3,
            RoadClass::Tertiary => 4,
            RoadClass::Residential => 5,
            RoadClass::Unclassified => 6,
            RoadClass::Service => 7,
            RoadClass::Other => 8,
        }
    }
}

impl FromStr for RoadClass {
    type Err = std::convert::Infallible;

    /// unrecognized classes fall back to [RoadClass::Other].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let class = match s.trim().to_lowercase().as_str() {
            "motorway" => RoadClass::Motorway,
            "trunk" => RoadClass::Trunk,
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "unclassified" => RoadClass::Unclassified,
            "service" => RoadClass::Service,
            _ => RoadClass::Other,
        };
        Ok(class)
    }
}

impl Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoadClass::Motorway => "Motorway",
            RoadClass::Trunk => "Trunk",
            RoadClass::Primary => "Primary",
            RoadClass::Secondary => "Secondary",
            RoadClass::Tertiary => "Tertiary",
            RoadClass::Residential => "Residential",
            RoadClass::Unclassified => "Unclassified",
            RoadClass::Service => "Service",
            RoadClass::Other => "Other",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::RoadClass;

    #[test]
    fn test_unknown_class_is_other() {
        let class: RoadClass = serde_json::from_str("\"Footway\"").unwrap();
        assert_eq!(class, RoadClass::Other);
        assert_eq!(class.rank(), 8);
        assert_eq!("living_street".parse::<RoadClass>().unwrap(), RoadClass::Other);
    }

    #[test]
    fn test_rank_follows_hierarchy() {
        assert!(RoadClass::Motorway.rank() < RoadClass::Residential.rank());
        assert_eq!("Tertiary".parse::<RoadClass>().unwrap().rank(), 4);
    }
}
