//! Directional adjacency index.
//!
//! Each vertex type owns two of these: one for the tail→head direction and
//! one for head→tail. Entries are keyed edge type → peer vertex type →
//! local vertex id, with packed `(edge id, peer id)` pairs in the leaf
//! sets. For a directed edge type the two sides (one entry in the tail's
//! tail→head index, one in the head's head→tail index) are always created
//! and destroyed together.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{EdgePeer, LocalId, TypeId};

type PeerBuckets = BTreeMap<LocalId, BTreeSet<EdgePeer>>;

/// Nested adjacency map for one direction of one vertex type.
#[derive(Debug, Default, Clone)]
pub(crate) struct AdjacencyIndex {
    map: BTreeMap<TypeId, BTreeMap<TypeId, PeerBuckets>>,
}

impl AdjacencyIndex {
    /// Records that `vertex` reaches a peer of `peer_type` through `entry`.
    ///
    /// Intermediate levels are created on demand. If an earlier failed
    /// insert left an empty level behind, this re-populates it.
    pub fn insert(&mut self, edge_type: TypeId, peer_type: TypeId, vertex: LocalId, entry: EdgePeer) {
        self.map
            .entry(edge_type)
            .or_default()
            .entry(peer_type)
            .or_default()
            .entry(vertex)
            .or_default()
            .insert(entry);
    }

    /// Removes one adjacency entry, pruning every level it empties.
    ///
    /// Returns false if the entry was not present.
    pub fn remove(&mut self, edge_type: TypeId, peer_type: TypeId, vertex: LocalId, entry: EdgePeer) -> bool {
        let Some(by_peer) = self.map.get_mut(&edge_type) else {
            return false;
        };
        let Some(buckets) = by_peer.get_mut(&peer_type) else {
            return false;
        };
        let Some(set) = buckets.get_mut(&vertex) else {
            return false;
        };
        let removed = set.remove(&entry);
        if set.is_empty() {
            buckets.remove(&vertex);
        }
        if buckets.is_empty() {
            by_peer.remove(&peer_type);
        }
        if by_peer.is_empty() {
            self.map.remove(&edge_type);
        }
        removed
    }

    /// Iterates, per peer type, the packed entries recorded for `vertex`
    /// under `edge_type`.
    pub fn buckets(
        &self,
        edge_type: TypeId,
        vertex: LocalId,
    ) -> impl Iterator<Item = (TypeId, &BTreeSet<EdgePeer>)> {
        self.map
            .get(&edge_type)
            .into_iter()
            .flat_map(move |by_peer| {
                by_peer
                    .iter()
                    .filter_map(move |(peer_type, buckets)| {
                        buckets.get(&vertex).map(|set| (*peer_type, set))
                    })
            })
    }

    /// Sum of bucket sizes for `vertex` under `edge_type`, without
    /// materializing peers.
    pub fn degree(&self, edge_type: TypeId, vertex: LocalId) -> usize {
        self.buckets(edge_type, vertex).map(|(_, set)| set.len()).sum()
    }

    /// Every `(edge type, entry)` pair recorded for `vertex`, across all
    /// edge and peer types. Removal cascades use this to find the edges a
    /// dying vertex participates in.
    pub fn entries_for(&self, vertex: LocalId) -> impl Iterator<Item = (TypeId, EdgePeer)> + '_ {
        self.map.iter().flat_map(move |(edge_type, by_peer)| {
            by_peer.values().flat_map(move |buckets| {
                buckets
                    .get(&vertex)
                    .into_iter()
                    .flatten()
                    .map(move |entry| (*edge_type, *entry))
            })
        })
    }
}

/// How an edge type answers traversal queries, fixed at creation.
///
/// Directed types maintain both directional indexes. Undirected types
/// maintain none and pay a full scan of their edge collection per
/// traversal instead, trading query time for index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjacencyStrategy {
    /// Neighbor queries read the directional indexes.
    Indexed,
    /// Neighbor queries scan the edge-record collection.
    EdgeScan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_prune_empty_levels() {
        let mut index = AdjacencyIndex::default();
        let entry = EdgePeer::new(9, 4);
        index.insert(2, 1, 7, entry);

        assert_eq!(index.degree(2, 7), 1);
        let collected: Vec<_> = index.buckets(2, 7).collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].0, 1);
        assert!(collected[0].1.contains(&entry));

        assert!(index.remove(2, 1, 7, entry));
        assert_eq!(index.degree(2, 7), 0);
        assert!(index.buckets(2, 7).next().is_none());
        // Removing again reports absence rather than erroring.
        assert!(!index.remove(2, 1, 7, entry));
    }

    #[test]
    fn degree_spans_peer_types() {
        let mut index = AdjacencyIndex::default();
        index.insert(5, 1, 3, EdgePeer::new(10, 8));
        index.insert(5, 2, 3, EdgePeer::new(11, 8));
        index.insert(5, 2, 3, EdgePeer::new(12, 9));
        index.insert(6, 2, 3, EdgePeer::new(13, 9));

        assert_eq!(index.degree(5, 3), 3);
        assert_eq!(index.degree(6, 3), 1);
        assert_eq!(index.degree(7, 3), 0);
    }
}
