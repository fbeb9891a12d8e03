use super::NetworkEdge;

/// edges ordered so each one departs from the node the previous one arrives at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeChain<E, N>(Vec<NetworkEdge<E, N>>);

impl<E: Clone + PartialEq, N: Clone + PartialEq> EdgeChain<E, N> {
    pub fn new(edges: Vec<NetworkEdge<E, N>>) -> Self {
        Self(edges)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<E> {
        self.0.iter().map(|e| e.id.clone()).collect()
    }

    /// the nodes visited by this chain, in order.
    pub fn node_ids(&self) -> Vec<N> {
        match self.0.first() {
            None => vec![],
            Some(first) => std::iter::once(first.from.clone())
                .chain(self.0.iter().map(|e| e.to.clone()))
                .collect(),
        }
    }

    /// true if every edge of this chain appears in `other`, in order, by node pair.
    /// the edges need not be contiguous in `other`.
    pub fn is_subchain_of(&self, other: &EdgeChain<E, N>) -> bool {
        let mut remaining = self.0.iter().peekable();
        for edge in other.0.iter() {
            if remaining.next_if(|e| e.same_nodes(edge)).is_some() && remaining.peek().is_none() {
                return true;
            }
        }
        remaining.peek().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(pairs: &[(u32, u32)]) -> EdgeChain<usize, u32> {
        EdgeChain::new(
            pairs
                .iter()
                .enumerate()
                .map(|(id, (from, to))| NetworkEdge::new(id, *from, *to))
                .collect(),
        )
    }

    #[test]
    fn test_subchain_in_order() {
        let long = chain(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        assert!(chain(&[(2, 3), (4, 5)]).is_subchain_of(&long));
        assert!(chain(&[(1, 2), (2, 3), (3, 4), (4, 5)]).is_subchain_of(&long));
        assert!(!chain(&[(4, 5), (2, 3)]).is_subchain_of(&long));
        assert!(!chain(&[(2, 1)]).is_subchain_of(&long));
    }

    #[test]
    fn test_node_ids() {
        assert_eq!(chain(&[(1, 2), (2, 3)]).node_ids(), vec![1, 2, 3]);
        assert!(chain(&[]).node_ids().is_empty());
        assert!(chain(&[]).is_empty());
    }
}
