//! Vertex and edge type records.
//!
//! Types live in the graph's create-only arena and link into a forest via
//! parent/child type-id references. Each record owns its local-id
//! allocator (which doubles as element membership), its name→property map,
//! and — for vertex types — the two directional adjacency indexes.

use std::collections::{BTreeMap, HashMap};

use crate::db::core::adjacency::{AdjacencyIndex, AdjacencyStrategy};
use crate::db::core::allocator::IdAllocator;
use crate::error::{GraphError, Result};
use crate::model::{LocalId, PropertyId, TypeId, Vertex};

#[derive(Debug, Clone)]
pub(crate) struct VertexTypeRecord {
    pub name: String,
    pub base: Option<TypeId>,
    pub subtypes: Vec<TypeId>,
    pub allocator: IdAllocator,
    pub properties: HashMap<String, PropertyId>,
    pub tail_to_head: AdjacencyIndex,
    pub head_to_tail: AdjacencyIndex,
}

impl VertexTypeRecord {
    pub fn new(name: &str, base: Option<TypeId>) -> Self {
        Self {
            name: name.to_string(),
            base,
            subtypes: Vec::new(),
            allocator: IdAllocator::new(),
            properties: HashMap::new(),
            tail_to_head: AdjacencyIndex::default(),
            head_to_tail: AdjacencyIndex::default(),
        }
    }

    /// Whether `local` names a live vertex of this exact type.
    pub fn contains(&self, local: LocalId) -> bool {
        self.allocator.contains(local)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeTypeRecord {
    pub name: String,
    pub base: Option<TypeId>,
    pub subtypes: Vec<TypeId>,
    pub directed: bool,
    pub strategy: AdjacencyStrategy,
    pub allocator: IdAllocator,
    pub properties: HashMap<String, PropertyId>,
    pub store: EdgeStore,
}

impl EdgeTypeRecord {
    pub fn new(name: &str, directed: bool, base: Option<TypeId>) -> Self {
        Self {
            name: name.to_string(),
            base,
            subtypes: Vec::new(),
            directed,
            strategy: strategy_for(directed),
            allocator: IdAllocator::new(),
            properties: HashMap::new(),
            store: EdgeStore::unrestricted(),
        }
    }

    pub fn new_restricted(
        name: &str,
        directed: bool,
        tail_type: TypeId,
        head_type: TypeId,
        base: Option<TypeId>,
    ) -> Self {
        Self {
            name: name.to_string(),
            base,
            subtypes: Vec::new(),
            directed,
            strategy: strategy_for(directed),
            allocator: IdAllocator::new(),
            properties: HashMap::new(),
            store: EdgeStore::restricted(tail_type, head_type),
        }
    }

    pub fn contains(&self, local: LocalId) -> bool {
        self.allocator.contains(local)
    }
}

/// Directed types get both directional indexes; undirected types get none
/// and answer traversals by scanning their edge collection.
fn strategy_for(directed: bool) -> AdjacencyStrategy {
    if directed {
        AdjacencyStrategy::Indexed
    } else {
        AdjacencyStrategy::EdgeScan
    }
}

/// Packed endpoints of a restricted edge: head local id in the high 32
/// bits, tail in the low. Both endpoint types are implied by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EndpointPair(u64);

impl EndpointPair {
    fn new(tail: LocalId, head: LocalId) -> Self {
        Self((u64::from(head) << 32) | u64::from(tail))
    }

    fn tail(self) -> LocalId {
        self.0 as u32
    }

    fn head(self) -> LocalId {
        (self.0 >> 32) as u32
    }
}

/// Explicit endpoints of an unrestricted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeEnds {
    tail_type: TypeId,
    tail: LocalId,
    head_type: TypeId,
    head: LocalId,
}

/// Edge-record collection of one edge type, keyed by local edge id.
///
/// A restricted type's endpoints are statically typed by the schema, so
/// its records pack into a single 64-bit word; an unrestricted type stores
/// the concrete endpoint types per edge.
#[derive(Debug, Clone)]
pub(crate) enum EdgeStore {
    Restricted {
        tail_type: TypeId,
        head_type: TypeId,
        edges: BTreeMap<LocalId, EndpointPair>,
    },
    Unrestricted {
        edges: BTreeMap<LocalId, EdgeEnds>,
    },
}

impl EdgeStore {
    fn unrestricted() -> Self {
        EdgeStore::Unrestricted {
            edges: BTreeMap::new(),
        }
    }

    fn restricted(tail_type: TypeId, head_type: TypeId) -> Self {
        EdgeStore::Restricted {
            tail_type,
            head_type,
            edges: BTreeMap::new(),
        }
    }

    /// The declared endpoint types, if this store is restricted.
    pub fn restriction(&self) -> Option<(TypeId, TypeId)> {
        match self {
            EdgeStore::Restricted {
                tail_type,
                head_type,
                ..
            } => Some((*tail_type, *head_type)),
            EdgeStore::Unrestricted { .. } => None,
        }
    }

    /// Records the endpoints of a new edge. Endpoint-type validation has
    /// already happened by the time this runs.
    pub fn insert(&mut self, edge: LocalId, tail: Vertex, head: Vertex) -> Result<()> {
        match self {
            EdgeStore::Restricted {
                tail_type,
                head_type,
                edges,
            } => {
                if tail.type_id() != *tail_type {
                    return Err(GraphError::InvalidEndpointType {
                        expected: *tail_type,
                        found: tail.type_id(),
                    });
                }
                if head.type_id() != *head_type {
                    return Err(GraphError::InvalidEndpointType {
                        expected: *head_type,
                        found: head.type_id(),
                    });
                }
                edges.insert(edge, EndpointPair::new(tail.local_id(), head.local_id()));
            }
            EdgeStore::Unrestricted { edges } => {
                edges.insert(
                    edge,
                    EdgeEnds {
                        tail_type: tail.type_id(),
                        tail: tail.local_id(),
                        head_type: head.type_id(),
                        head: head.local_id(),
                    },
                );
            }
        }
        Ok(())
    }

    /// The `(tail, head)` endpoints of `edge`, if the record exists.
    pub fn get(&self, edge: LocalId) -> Option<(Vertex, Vertex)> {
        match self {
            EdgeStore::Restricted {
                tail_type,
                head_type,
                edges,
            } => edges.get(&edge).map(|pair| {
                (
                    Vertex::new(*tail_type, pair.tail()),
                    Vertex::new(*head_type, pair.head()),
                )
            }),
            EdgeStore::Unrestricted { edges } => edges.get(&edge).map(|ends| {
                (
                    Vertex::new(ends.tail_type, ends.tail),
                    Vertex::new(ends.head_type, ends.head),
                )
            }),
        }
    }

    /// Drops the record for `edge`, returning its endpoints.
    pub fn remove(&mut self, edge: LocalId) -> Option<(Vertex, Vertex)> {
        match self {
            EdgeStore::Restricted {
                tail_type,
                head_type,
                edges,
            } => edges.remove(&edge).map(|pair| {
                (
                    Vertex::new(*tail_type, pair.tail()),
                    Vertex::new(*head_type, pair.head()),
                )
            }),
            EdgeStore::Unrestricted { edges } => edges.remove(&edge).map(|ends| {
                (
                    Vertex::new(ends.tail_type, ends.tail),
                    Vertex::new(ends.head_type, ends.head),
                )
            }),
        }
    }

    /// Iterates every edge record as `(local id, tail, head)` in ascending
    /// edge-id order. This is the scan path undirected traversal pays.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (LocalId, Vertex, Vertex)> + '_> {
        match self {
            EdgeStore::Restricted {
                tail_type,
                head_type,
                edges,
            } => Box::new(edges.iter().map(move |(id, pair)| {
                (
                    *id,
                    Vertex::new(*tail_type, pair.tail()),
                    Vertex::new(*head_type, pair.head()),
                )
            })),
            EdgeStore::Unrestricted { edges } => Box::new(edges.iter().map(|(id, ends)| {
                (
                    *id,
                    Vertex::new(ends.tail_type, ends.tail),
                    Vertex::new(ends.head_type, ends.head),
                )
            })),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EdgeStore::Restricted { edges, .. } => edges.len(),
            EdgeStore::Unrestricted { edges } => edges.len(),
        }
    }
}
