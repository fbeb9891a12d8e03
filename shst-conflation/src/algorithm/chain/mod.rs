//! orders an unordered set of directed edges into chains that follow their shared
//! nodes. used to order a reference line's way sections, the matched segments of a
//! single target map feature, and runs of reference lines.
mod chain_bearing;
mod chain_mode;
mod chain_ops;
mod edge_chain;
mod edge_derivation;
mod network_edge;

pub use chain_bearing::{chain_bearing, follows_direction};
pub use chain_mode::ChainMode;
pub use chain_ops::{
    order_matched_segments, order_way_sections, reconstruct_chains, reference_chains,
    OrderedMatches,
};
pub use edge_chain::EdgeChain;
pub use edge_derivation::{coordinate_key, derive_edges};
pub use network_edge::NetworkEdge;
