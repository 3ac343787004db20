//! Vireo is an embedded, typed property-graph storage engine.
//!
//! A [`Graph`] owns a schema of vertex and edge types arranged in a
//! single-parent hierarchy, hands out compact reusable local ids packed
//! into globally unique 64-bit composite ids, indexes adjacency per
//! direction for fast neighbor and path queries, and stores typed
//! property values with value-to-element lookup in unique or
//! multi-valued flavors.
//!
//! ```no_run
//! use vireo::{DataType, Direction, Graph, PropertyKind, PropertyValue};
//!
//! let mut g = Graph::new();
//! let person = g.new_vertex_type("person")?;
//! let knows = g.new_edge_type("knows", true)?;
//! let name = g.new_property(person, "name", DataType::String, PropertyKind::Unique)?;
//!
//! let ada = g.new_vertex(person)?;
//! let grace = g.new_vertex(person)?;
//! g.set_property(ada.id(), name, PropertyValue::from("Ada"))?;
//! g.new_edge(knows, ada, grace)?;
//!
//! let peers = g.neighbors(ada, knows, Direction::Out)?;
//! assert!(peers.contains(grace.id()));
//! # Ok::<(), vireo::GraphError>(())
//! ```

pub mod db;
pub mod error;
pub mod logging;
pub mod model;

pub use db::{AdjacencyStrategy, Config, EndpointRestriction, Graph, MetricsSnapshot, PerformanceMetrics};
pub use error::{GraphError, Result};
pub use logging::init_logging;
pub use model::{
    DataType, Direction, Edge, EdgePeer, ElementId, ElementKind, Elements, LocalId, PropertyId,
    PropertyKind, PropertyValue, TypeId, Vertex,
};
