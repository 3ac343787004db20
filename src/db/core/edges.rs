//! Edge element operations.
//!
//! Edge creation validates endpoints before the allocator grants an id, so
//! a rejected edge leaves no state behind. For a directed (indexed) edge
//! type, the two adjacency entries, the edge record, and the allocator
//! grant live and die together.

use tracing::debug;

use crate::db::core::adjacency::AdjacencyStrategy;
use crate::db::core::graph::Graph;
use crate::db::core::property::PropertySlot;
use crate::db::metrics::PerformanceMetrics;
use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgePeer, LocalId, TypeId, Vertex};

impl Graph {
    /// Creates an edge of `edge_type` from `tail` to `head`.
    ///
    /// Both endpoints must be live vertices; a restricted edge type also
    /// requires their exact types to match its declaration. Validation
    /// happens before anything mutates.
    pub fn new_edge(&mut self, edge_type: TypeId, tail: Vertex, head: Vertex) -> Result<Edge> {
        if !self.vertex_exists(tail) {
            return Err(GraphError::ElementNotFound("tail vertex"));
        }
        if !self.vertex_exists(head) {
            return Err(GraphError::ElementNotFound("head vertex"));
        }
        let record = self.edge_type(edge_type)?;
        if let Some((tail_type, head_type)) = record.store.restriction() {
            if tail.type_id() != tail_type {
                return Err(GraphError::InvalidEndpointType {
                    expected: tail_type,
                    found: tail.type_id(),
                });
            }
            if head.type_id() != head_type {
                return Err(GraphError::InvalidEndpointType {
                    expected: head_type,
                    found: head.type_id(),
                });
            }
        }
        let strategy = record.strategy;

        let record = self.edge_type_mut(edge_type)?;
        let local = record.allocator.allocate()?;
        record.store.insert(local, tail, head)?;

        if strategy == AdjacencyStrategy::Indexed {
            self.vertex_type_mut(tail.type_id())?.tail_to_head.insert(
                edge_type,
                head.type_id(),
                tail.local_id(),
                EdgePeer::new(local, head.local_id()),
            );
            self.vertex_type_mut(head.type_id())?.head_to_tail.insert(
                edge_type,
                tail.type_id(),
                head.local_id(),
                EdgePeer::new(local, tail.local_id()),
            );
        }

        let edge = Edge::new(edge_type, local);
        debug!(edge = %edge.id(), tail = %tail.id(), head = %head.id(), "created edge");
        Ok(edge)
    }

    /// Whether `edge` names a live edge of its exact type.
    pub fn edge_exists(&self, edge: Edge) -> bool {
        self.edge_types
            .get(&edge.type_id())
            .map(|record| record.contains(edge.local_id()))
            .unwrap_or(false)
    }

    /// Resolves a local id to an edge handle, descending into subtypes
    /// when `polymorphic`.
    pub fn get_edge(&self, edge_type: TypeId, local: LocalId, polymorphic: bool) -> Result<Edge> {
        if self.config.collect_metrics {
            PerformanceMetrics::bump(&self.metrics.edge_lookups, 1);
        }
        let mut pending = vec![edge_type];
        while let Some(type_id) = pending.pop() {
            let record = self.edge_type(type_id)?;
            if record.contains(local) {
                return Ok(Edge::new(type_id, local));
            }
            if polymorphic {
                pending.extend(record.subtypes.iter().copied());
            }
        }
        Err(GraphError::ElementNotFound("edge"))
    }

    /// The `(tail, head)` endpoints of `edge`.
    pub fn edge_endpoints(&self, edge: Edge) -> Result<(Vertex, Vertex)> {
        if self.config.collect_metrics {
            PerformanceMetrics::bump(&self.metrics.edge_lookups, 1);
        }
        self.edge_type(edge.type_id())?
            .store
            .get(edge.local_id())
            .ok_or(GraphError::ElementNotFound("edge"))
    }

    /// All edges of `edge_type`, ascending by local id; subtype edges
    /// follow in pre-order when `polymorphic`.
    pub fn enumerate_edges(&self, edge_type: TypeId, polymorphic: bool) -> Result<Vec<Edge>> {
        let mut out = Vec::new();
        self.collect_edges(edge_type, polymorphic, &mut out)?;
        Ok(out)
    }

    fn collect_edges(&self, type_id: TypeId, polymorphic: bool, out: &mut Vec<Edge>) -> Result<()> {
        let record = self.edge_type(type_id)?;
        out.extend(record.allocator.iter().map(|local| Edge::new(type_id, local)));
        if polymorphic {
            for subtype in &record.subtypes {
                self.collect_edges(*subtype, true, out)?;
            }
        }
        Ok(())
    }

    /// Removes `edge`: both adjacency entries (for an indexed type), its
    /// property values, its endpoint record, and finally the allocator
    /// grant.
    pub fn remove_edge(&mut self, edge: Edge) -> Result<()> {
        let edge_type = edge.type_id();
        let local = edge.local_id();

        let record = self.edge_type_mut(edge_type)?;
        let strategy = record.strategy;
        let Some((tail, head)) = record.store.remove(local) else {
            return Err(GraphError::ElementNotFound("edge"));
        };
        record.allocator.free(local)?;

        if strategy == AdjacencyStrategy::Indexed {
            self.vertex_type_mut(tail.type_id())?.tail_to_head.remove(
                edge_type,
                head.type_id(),
                tail.local_id(),
                EdgePeer::new(local, head.local_id()),
            );
            self.vertex_type_mut(head.type_id())?.head_to_tail.remove(
                edge_type,
                tail.type_id(),
                head.local_id(),
                EdgePeer::new(local, tail.local_id()),
            );
        }

        for slot in &mut self.properties {
            if let PropertySlot::Occupied(prop) = slot {
                if prop.owner == edge_type {
                    prop.store.remove(local);
                }
            }
        }

        debug!(edge = %edge.id(), "removed edge");
        Ok(())
    }
}
