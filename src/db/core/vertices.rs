//! Vertex element operations.

use std::collections::BTreeSet;

use tracing::debug;

use crate::db::core::adjacency::AdjacencyStrategy;
use crate::db::core::graph::Graph;
use crate::db::core::property::PropertySlot;
use crate::db::metrics::PerformanceMetrics;
use crate::error::{GraphError, Result};
use crate::model::{Edge, LocalId, TypeId, Vertex};

impl Graph {
    /// Creates a vertex of `vertex_type`, granting the lowest reusable
    /// local id.
    pub fn new_vertex(&mut self, vertex_type: TypeId) -> Result<Vertex> {
        let local = self.vertex_type_mut(vertex_type)?.allocator.allocate()?;
        let vertex = Vertex::new(vertex_type, local);
        debug!(vertex = %vertex.id(), "created vertex");
        Ok(vertex)
    }

    /// Whether `vertex` names a live vertex of its exact type.
    pub fn vertex_exists(&self, vertex: Vertex) -> bool {
        self.vertex_types
            .get(&vertex.type_id())
            .map(|record| record.contains(vertex.local_id()))
            .unwrap_or(false)
    }

    /// Resolves a local id to a vertex handle. The exact type is checked
    /// first; with `polymorphic` the search descends into subtypes until
    /// a type claiming the id is found.
    pub fn get_vertex(
        &self,
        vertex_type: TypeId,
        local: LocalId,
        polymorphic: bool,
    ) -> Result<Vertex> {
        if self.config.collect_metrics {
            PerformanceMetrics::bump(&self.metrics.vertex_lookups, 1);
        }
        let mut pending = vec![vertex_type];
        while let Some(type_id) = pending.pop() {
            let record = self.vertex_type(type_id)?;
            if record.contains(local) {
                return Ok(Vertex::new(type_id, local));
            }
            if polymorphic {
                pending.extend(record.subtypes.iter().copied());
            }
        }
        Err(GraphError::ElementNotFound("vertex"))
    }

    /// All vertices of `vertex_type`, in ascending local-id order. With
    /// `polymorphic`, subtype vertices follow in pre-order over the
    /// subtype forest. No element appears twice since each belongs to
    /// exactly one type.
    pub fn enumerate_vertices(&self, vertex_type: TypeId, polymorphic: bool) -> Result<Vec<Vertex>> {
        let mut out = Vec::new();
        self.collect_vertices(vertex_type, polymorphic, &mut out)?;
        Ok(out)
    }

    fn collect_vertices(
        &self,
        type_id: TypeId,
        polymorphic: bool,
        out: &mut Vec<Vertex>,
    ) -> Result<()> {
        let record = self.vertex_type(type_id)?;
        out.extend(
            record
                .allocator
                .iter()
                .map(|local| Vertex::new(type_id, local)),
        );
        if polymorphic {
            for subtype in &record.subtypes {
                self.collect_vertices(*subtype, true, out)?;
            }
        }
        Ok(())
    }

    /// Removes `vertex` and cascades: every incident edge goes first
    /// (clearing its own properties and adjacency entries), then the
    /// vertex's property values, then its local id returns to the
    /// allocator for reuse.
    pub fn remove_vertex(&mut self, vertex: Vertex) -> Result<()> {
        let record = self.vertex_type(vertex.type_id())?;
        if !record.contains(vertex.local_id()) {
            return Err(GraphError::ElementNotFound("vertex"));
        }

        let mut incident: BTreeSet<Edge> = BTreeSet::new();
        for (edge_type, entry) in record.tail_to_head.entries_for(vertex.local_id()) {
            incident.insert(Edge::new(edge_type, entry.edge_id()));
        }
        for (edge_type, entry) in record.head_to_tail.entries_for(vertex.local_id()) {
            incident.insert(Edge::new(edge_type, entry.edge_id()));
        }
        // Undirected edge types keep no index, so their stores get scanned.
        for (type_id, edge_record) in &self.edge_types {
            if edge_record.strategy == AdjacencyStrategy::EdgeScan {
                for (local, tail, head) in edge_record.store.iter() {
                    if tail == vertex || head == vertex {
                        incident.insert(Edge::new(*type_id, local));
                    }
                }
            }
        }

        for edge in incident {
            self.remove_edge(edge)?;
        }

        let owner = vertex.type_id();
        for slot in &mut self.properties {
            if let PropertySlot::Occupied(prop) = slot {
                if prop.owner == owner {
                    prop.store.remove(vertex.local_id());
                }
            }
        }

        self.vertex_type_mut(owner)?.allocator.free(vertex.local_id())?;
        debug!(vertex = %vertex.id(), "removed vertex");
        Ok(())
    }
}
