mod adjacency;
mod allocator;
mod edges;
mod graph;
mod property;
mod schema;
mod traversal;
mod vertices;

pub use adjacency::AdjacencyStrategy;
pub use graph::{EndpointRestriction, Graph};
