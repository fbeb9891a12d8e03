/// a directed edge between two nodes. `id` distinguishes parallel edges sharing
/// the same endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEdge<E, N> {
    pub id: E,
    pub from: N,
    pub to: N,
}

impl<E: PartialEq, N: PartialEq> NetworkEdge<E, N> {
    pub fn new(id: E, from: N, to: N) -> Self {
        Self { id, from, to }
    }

    /// true if `other` runs between the same nodes in the opposite direction.
    pub fn is_opposite(&self, other: &Self) -> bool {
        self.from == other.to && self.to == other.from
    }

    /// true if `other` is a different edge leaving the node this edge arrives at.
    pub fn leads_to(&self, other: &Self) -> bool {
        self.to == other.from && self.id != other.id
    }

    pub fn same_nodes(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }

    pub(crate) fn is_same_or_opposite(&self, other: &Self) -> bool {
        self.id == other.id || self.is_opposite(other)
    }
}
