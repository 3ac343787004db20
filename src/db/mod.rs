mod config;
mod core;
mod metrics;

pub use config::Config;
pub use self::core::{AdjacencyStrategy, EndpointRestriction, Graph};
pub use metrics::{MetricsSnapshot, PerformanceMetrics};
