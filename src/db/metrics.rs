//! Lightweight operation counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters bumped from lookup and traversal hot paths.
///
/// Counters are relaxed atomics so read-only query paths can record hits
/// without exclusive access to the graph. Collection is controlled by
/// [`Config::collect_metrics`].
///
/// [`Config::collect_metrics`]: crate::Config::collect_metrics
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    /// Vertex existence / handle lookups.
    pub vertex_lookups: AtomicU64,
    /// Edge record lookups.
    pub edge_lookups: AtomicU64,
    /// Value-index lookups served from an index.
    pub index_hits: AtomicU64,
    /// Traversals that fell back to a full edge-collection scan.
    pub full_scans: AtomicU64,
    /// Adjacency entries decoded during traversal.
    pub edge_traversals: AtomicU64,
    /// One-hop expansions performed by path search.
    pub path_expansions: AtomicU64,
}

/// Point-in-time copy of [`PerformanceMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub vertex_lookups: u64,
    pub edge_lookups: u64,
    pub index_hits: u64,
    pub full_scans: u64,
    pub edge_traversals: u64,
    pub path_expansions: u64,
}

impl PerformanceMetrics {
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            vertex_lookups: self.vertex_lookups.load(Ordering::Relaxed),
            edge_lookups: self.edge_lookups.load(Ordering::Relaxed),
            index_hits: self.index_hits.load(Ordering::Relaxed),
            full_scans: self.full_scans.load(Ordering::Relaxed),
            edge_traversals: self.edge_traversals.load(Ordering::Relaxed),
            path_expansions: self.path_expansions.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.vertex_lookups.store(0, Ordering::Relaxed);
        self.edge_lookups.store(0, Ordering::Relaxed);
        self.index_hits.store(0, Ordering::Relaxed);
        self.full_scans.store(0, Ordering::Relaxed);
        self.edge_traversals.store(0, Ordering::Relaxed);
        self.path_expansions.store(0, Ordering::Relaxed);
    }
}
