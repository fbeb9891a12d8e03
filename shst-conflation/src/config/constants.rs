/// matched segment endpoints within this distance (km) of a reference line endpoint
/// are snapped to it, and intervals shorter than it are discarded.
pub const SPLIT_BUFF_KM: f64 = 10.0 / 1000.0;

/// an interval shorter than [SPLIT_BUFF_KM] is still kept when it covers at least
/// this fraction of its reference line.
pub const LENGTH_RATIO_THRESHOLD: f64 = 0.5;

/// tolerance (km) used when comparing offsets along a reference line.
pub const OFFSET_EPSILON_KM: f64 = 1e-9;

/// decimal places used to quantize endpoint coordinates into node keys.
pub const COORDINATE_PRECISION: u32 = 5;

/// name of the source that describes the OSM ways underlying each reference line.
pub const OSM_SOURCE: &str = "osm";

/// two bearings (degrees) closer than this are considered the same direction of travel.
pub const FOLLOWS_DIRECTION_BEARING_THRESHOLD: f64 = 45.0;

pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_BATCH_SIZE: usize = 1024;
