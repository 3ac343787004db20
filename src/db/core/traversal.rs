//! Neighbor queries, degrees, one-hop expansion, and breadth-first path
//! search.
//!
//! Every query dispatches on the edge type's adjacency strategy: indexed
//! types read the directional indexes of the queried vertex's type,
//! scan types walk their edge collection testing both endpoints. For a
//! scan type direction carries no meaning, since its edges have no
//! indexed orientation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::db::core::adjacency::AdjacencyStrategy;
use crate::db::core::graph::Graph;
use crate::db::metrics::PerformanceMetrics;
use crate::error::{GraphError, Result};
use crate::model::{Direction, Edge, ElementId, Elements, TypeId, Vertex};

impl Graph {
    /// Every `(edge, peer)` pair incident to `vertex` via `edge_type` in
    /// `direction`. Parallel edges each contribute one pair.
    fn incident(
        &self,
        vertex: Vertex,
        edge_type: TypeId,
        direction: Direction,
    ) -> Result<Vec<(Edge, Vertex)>> {
        if !self.vertex_exists(vertex) {
            return Err(GraphError::ElementNotFound("vertex"));
        }
        let edge_record = self.edge_type(edge_type)?;
        if self.config.collect_metrics {
            PerformanceMetrics::bump(&self.metrics.edge_traversals, 1);
        }

        let mut out = Vec::new();
        match edge_record.strategy {
            AdjacencyStrategy::Indexed => {
                let record = self.vertex_type(vertex.type_id())?;
                if matches!(direction, Direction::Out | Direction::Both) {
                    for (peer_type, set) in
                        record.tail_to_head.buckets(edge_type, vertex.local_id())
                    {
                        for entry in set {
                            out.push((
                                Edge::new(edge_type, entry.edge_id()),
                                Vertex::new(peer_type, entry.peer_id()),
                            ));
                        }
                    }
                }
                if matches!(direction, Direction::In | Direction::Both) {
                    for (peer_type, set) in
                        record.head_to_tail.buckets(edge_type, vertex.local_id())
                    {
                        for entry in set {
                            out.push((
                                Edge::new(edge_type, entry.edge_id()),
                                Vertex::new(peer_type, entry.peer_id()),
                            ));
                        }
                    }
                }
            }
            AdjacencyStrategy::EdgeScan => {
                if self.config.collect_metrics {
                    PerformanceMetrics::bump(&self.metrics.full_scans, 1);
                }
                for (local, tail, head) in edge_record.store.iter() {
                    let edge = Edge::new(edge_type, local);
                    if tail == vertex {
                        out.push((edge, head));
                    } else if head == vertex {
                        out.push((edge, tail));
                    }
                }
            }
        }
        Ok(out)
    }

    /// The peers `vertex` reaches via `edge_type` in `direction`, as a
    /// de-duplicated element set.
    pub fn neighbors(
        &self,
        vertex: Vertex,
        edge_type: TypeId,
        direction: Direction,
    ) -> Result<Elements> {
        Ok(self
            .incident(vertex, edge_type, direction)?
            .into_iter()
            .map(|(_, peer)| peer.id())
            .collect())
    }

    /// The union of `neighbors` over a collection of vertices.
    pub fn neighbors_of_all(
        &self,
        vertices: &[Vertex],
        edge_type: TypeId,
        direction: Direction,
    ) -> Result<Elements> {
        let mut out = Elements::new();
        for vertex in vertices {
            out.union(&self.neighbors(*vertex, edge_type, direction)?);
        }
        Ok(out)
    }

    /// Incident-edge count for `vertex` via `edge_type` in `direction`.
    /// Indexed types answer from bucket sizes without materializing
    /// peers; scan types count matching edge records.
    pub fn degree(&self, vertex: Vertex, edge_type: TypeId, direction: Direction) -> Result<usize> {
        if !self.vertex_exists(vertex) {
            return Err(GraphError::ElementNotFound("vertex"));
        }
        let edge_record = self.edge_type(edge_type)?;
        match edge_record.strategy {
            AdjacencyStrategy::Indexed => {
                let record = self.vertex_type(vertex.type_id())?;
                let mut count = 0;
                if matches!(direction, Direction::Out | Direction::Both) {
                    count += record.tail_to_head.degree(edge_type, vertex.local_id());
                }
                if matches!(direction, Direction::In | Direction::Both) {
                    count += record.head_to_tail.degree(edge_type, vertex.local_id());
                }
                Ok(count)
            }
            AdjacencyStrategy::EdgeScan => {
                if self.config.collect_metrics {
                    PerformanceMetrics::bump(&self.metrics.full_scans, 1);
                }
                Ok(edge_record
                    .store
                    .iter()
                    .filter(|(_, tail, head)| *tail == vertex || *head == vertex)
                    .count())
            }
        }
    }

    /// One-hop expansion: every reachable peer mapped to one
    /// representative connecting edge. When parallel edges connect the
    /// same pair, the lowest-id edge is kept.
    pub fn traverse(
        &self,
        vertex: Vertex,
        edge_type: TypeId,
        direction: Direction,
    ) -> Result<BTreeMap<Vertex, Edge>> {
        let mut out = BTreeMap::new();
        for (edge, peer) in self.incident(vertex, edge_type, direction)? {
            out.entry(peer).or_insert(edge);
        }
        Ok(out)
    }

    /// Breadth-first search for edge-paths from `from` to `to` over
    /// `edge_type`, bounded by `max_hops`.
    ///
    /// With `all` false the first (hence shortest) path is returned
    /// alone; with `all` true the search continues and may report longer
    /// paths through distinct intermediate vertices. Paths come out in
    /// BFS order, shortest first; relative order among equal-length paths
    /// follows index enumeration order and is not part of the contract.
    ///
    /// The visited set is keyed by full composite identity, so two
    /// vertices of different types sharing a local id never shadow each
    /// other. The target itself is never marked visited. `from == to`
    /// yields one empty path.
    pub fn shortest_paths(
        &self,
        from: Vertex,
        to: Vertex,
        edge_type: TypeId,
        max_hops: usize,
        all: bool,
    ) -> Result<Vec<Vec<Edge>>> {
        if !self.vertex_exists(from) {
            return Err(GraphError::ElementNotFound("vertex"));
        }
        if !self.vertex_exists(to) {
            return Err(GraphError::ElementNotFound("vertex"));
        }
        self.edge_type(edge_type)?;
        if from == to {
            return Ok(vec![Vec::new()]);
        }

        let mut paths = Vec::new();
        let mut visited: BTreeSet<ElementId> = BTreeSet::new();
        visited.insert(from.id());
        let mut queue: VecDeque<(Vertex, Vec<Edge>)> = VecDeque::new();
        queue.push_back((from, Vec::new()));

        while let Some((current, path)) = queue.pop_front() {
            if path.len() == max_hops {
                continue;
            }
            if self.config.collect_metrics {
                PerformanceMetrics::bump(&self.metrics.path_expansions, 1);
            }
            for (peer, edge) in self.traverse(current, edge_type, Direction::Out)? {
                if peer == to {
                    let mut found = path.clone();
                    found.push(edge);
                    paths.push(found);
                    if !all {
                        return Ok(paths);
                    }
                } else if visited.insert(peer.id()) {
                    let mut next = path.clone();
                    next.push(edge);
                    queue.push_back((peer, next));
                }
            }
        }
        Ok(paths)
    }
}
