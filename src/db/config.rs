//! Engine configuration options.
//!
//! Vireo has deliberately few knobs: the engine assumes one logical writer
//! and delegates durability to the embedding layer, so what remains
//! configurable is write-time policy.
//!
//! # Example
//!
//! ```rust
//! use vireo::Config;
//!
//! let config = Config::default();
//! assert!(config.enforce_unique);
//! ```

/// Configuration options for graph behavior.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reject writes to `Unique`-kind properties whose value is already
    /// held by a different element.
    ///
    /// When off, a duplicate write silently repoints the unique index at
    /// the newest element and uniqueness becomes the caller's contract.
    pub enforce_unique: bool,

    /// Maintain [`PerformanceMetrics`](crate::PerformanceMetrics) counters
    /// on lookup and traversal paths.
    pub collect_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enforce_unique: true,
            collect_metrics: true,
        }
    }
}

impl Config {
    /// Configuration that checks everything the engine can check.
    pub fn strict() -> Self {
        Self {
            enforce_unique: true,
            collect_metrics: true,
        }
    }

    /// Configuration matching the unchecked historical behavior: unique
    /// indexes are overwritten without complaint and no counters are kept.
    pub fn permissive() -> Self {
        Self {
            enforce_unique: false,
            collect_metrics: false,
        }
    }
}
