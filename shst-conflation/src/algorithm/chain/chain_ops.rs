use itertools::Itertools;

use super::{chain_bearing, derive_edges, ChainMode, EdgeChain, NetworkEdge};
use crate::model::{
    matches::MatchedSegment,
    reference::{ReferenceLine, WaySection},
    ChainError, ConflationError,
};

/// the matched segments of one target map feature in direction of travel order.
#[derive(Debug, Clone)]
pub struct OrderedMatches {
    pub segments: Vec<MatchedSegment>,
    /// final bearing of the whole chain, rounded to whole degrees.
    pub bearing: Option<f64>,
}

/// orders a set of directed edges into chains that follow shared nodes.
///
/// a source edge is one that no other edge leads into, ignoring its own reversed
/// twin. a chain is walked forward from each source; when more than one edge leaves
/// the current node, the walk forks and every branch is kept. chains contained in a
/// longer chain are discarded.
///
/// # Returns
///
/// the chains, longest first. empty input yields no chains.
///
/// # Errors
///
/// when no source edge exists, when the mode's limit on sources or chains is
/// exceeded, or when a [ChainMode::Directed] chain does not use every edge.
pub fn reconstruct_chains<E, N>(
    edges: &[NetworkEdge<E, N>],
    mode: ChainMode,
) -> Result<Vec<EdgeChain<E, N>>, ChainError>
where
    E: Clone + PartialEq,
    N: Clone + PartialEq,
{
    if edges.is_empty() {
        return Ok(vec![]);
    }

    let sources = edges
        .iter()
        .filter(|candidate| {
            edges
                .iter()
                .all(|other| other.is_opposite(candidate) || !other.leads_to(candidate))
        })
        .collect_vec();
    if sources.is_empty() {
        return Err(ChainError::NoSourceEdges(edges.len()));
    }
    if sources.len() > mode.max_sources() {
        return Err(ChainError::TooManySources {
            found: sources.len(),
            max: mode.max_sources(),
        });
    }

    let mut chains: Vec<Vec<&NetworkEdge<E, N>>> = sources.into_iter().map(|s| vec![s]).collect();
    let mut chain_idx = 0;
    while chain_idx < chains.len() {
        let mut candidates = edges
            .iter()
            .filter(|c| chains[chain_idx].iter().all(|m| !c.is_same_or_opposite(m)))
            .collect_vec();
        while let Some(&current) = chains[chain_idx].last() {
            let mut outbound = candidates
                .iter()
                .filter(|c| current.leads_to(c))
                .copied()
                .collect_vec();
            let next = match outbound.pop() {
                Some(next) => next,
                None => break,
            };
            for fork in outbound {
                let mut branch = chains[chain_idx].clone();
                branch.push(fork);
                chains.push(branch);
            }
            chains[chain_idx].push(next);
            candidates.retain(|c| !c.is_same_or_opposite(next));
        }
        chain_idx += 1;
    }

    let chains = chains
        .into_iter()
        .map(|c| EdgeChain::new(c.into_iter().cloned().collect_vec()))
        .sorted_by_key(|c| c.len())
        .collect_vec();
    let chains = chains
        .iter()
        .enumerate()
        .filter(|(idx, chain)| !chains[idx + 1..].iter().any(|other| chain.is_subchain_of(other)))
        .map(|(_, chain)| chain.clone())
        .sorted_by(|a, b| b.len().cmp(&a.len()))
        .collect_vec();

    if chains.len() > mode.max_chains() {
        return Err(ChainError::TooManyChains {
            found: chains.len(),
            max: mode.max_chains(),
        });
    }
    if mode == ChainMode::Directed {
        let covered = chains.first().map(|c| c.len()).unwrap_or_default();
        if covered != edges.len() {
            return Err(ChainError::IncompleteChain {
                covered,
                total: edges.len(),
            });
        }
    }
    Ok(chains)
}

/// orders the matched segments of a single target map feature into its direction of
/// travel. segments are joined by intersection ids, or by rounded endpoint
/// coordinates when ids are missing.
///
/// duplicate matches are removed first, see [`remove_duplicate_segments`]. a
/// directed feature yields at most one chain, a bidirectional feature at most two.
pub fn order_matched_segments(
    segments: Vec<MatchedSegment>,
    mode: ChainMode,
    coordinate_precision: u32,
) -> Result<Vec<OrderedMatches>, ConflationError> {
    let segments = remove_duplicate_segments(segments);
    let edges = derive_edges(&segments, coordinate_precision);
    if edges.len() != segments.len() {
        return Err(ConflationError::UpstreamDataDefect(format!(
            "{} of {} matched segments have no geometry",
            segments.len() - edges.len(),
            segments.len()
        )));
    }
    let ordered = reconstruct_chains(&edges, mode)?
        .iter()
        .map(|chain| {
            let ordered = chain
                .edge_ids()
                .into_iter()
                .filter_map(|idx| segments.get(idx).cloned())
                .collect_vec();
            let bearing = chain_bearing(ordered.iter().map(|s| &s.geometry));
            OrderedMatches {
                segments: ordered,
                bearing,
            }
        })
        .collect_vec();
    Ok(ordered)
}

/// drops repeated matches of the same reference line between the same pair of
/// intersections, keeping the first. segments lacking either intersection id are
/// only dropped when fully equal to an earlier one.
fn remove_duplicate_segments(segments: Vec<MatchedSegment>) -> Vec<MatchedSegment> {
    let total = segments.len();
    let mut kept: Vec<MatchedSegment> = Vec::with_capacity(total);
    for segment in segments.into_iter() {
        if !kept.iter().any(|k| is_duplicate_match(k, &segment)) {
            kept.push(segment);
        }
    }
    if kept.len() < total {
        log::debug!("removed {} duplicate matched segments", total - kept.len());
    }
    kept
}

fn is_duplicate_match(a: &MatchedSegment, b: &MatchedSegment) -> bool {
    match (
        &a.from_intersection_id,
        &a.to_intersection_id,
        &b.from_intersection_id,
        &b.to_intersection_id,
    ) {
        (Some(a_from), Some(a_to), Some(b_from), Some(b_to)) => {
            a.reference_id == b.reference_id && a_from == b_from && a_to == b_to
        }
        _ => a == b,
    }
}

/// orders the way sections of a reference line so consecutive sections share their
/// boundary node.
pub fn order_way_sections(sections: Vec<WaySection>) -> Result<Vec<WaySection>, ConflationError> {
    let edges = sections
        .iter()
        .enumerate()
        .map(|(idx, s)| match (s.first_node(), s.last_node()) {
            (Some(from), Some(to)) => Ok(NetworkEdge::new(idx, from, to)),
            _ => Err(ConflationError::UpstreamDataDefect(format!(
                "way section {} has no nodes",
                s.way_id
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let order = reconstruct_chains(&edges, ChainMode::Directed)?
        .into_iter()
        .next()
        .map(|c| c.edge_ids())
        .unwrap_or_default();
    let mut slots = sections.into_iter().map(Some).collect_vec();
    Ok(order
        .into_iter()
        .filter_map(|idx| slots.get_mut(idx).and_then(Option::take))
        .collect_vec())
}

/// chains of reference line ids joined at their intersections, one per direction of
/// travel along a two-way run.
pub fn reference_chains(references: &[ReferenceLine]) -> Result<Vec<Vec<String>>, ChainError> {
    let edges = references
        .iter()
        .map(|r| {
            NetworkEdge::new(
                r.id().to_string(),
                r.from_intersection_id().to_string(),
                r.to_intersection_id().to_string(),
            )
        })
        .collect_vec();
    Ok(reconstruct_chains(&edges, ChainMode::Bidirectional)?
        .into_iter()
        .map(|c| c.edge_ids())
        .collect_vec())
}
