//! Range-based local-id allocator.
//!
//! Each type tracks its in-use local ids as a sorted list of disjoint,
//! non-adjacent inclusive ranges. The list doubles as the type's element
//! membership structure: `contains` answers existence queries and `iter`
//! drives element enumeration, so no separate id set is kept.

use crate::error::{GraphError, Result};
use crate::model::LocalId;

/// Inclusive range of allocated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdRange {
    pub min: LocalId,
    pub max: LocalId,
}

/// Allocator for one type's local-id space.
///
/// Invariants: ranges are sorted ascending, disjoint, and never adjacent
/// (touching ranges are merged on allocation). No id is issued twice while
/// allocated; freed ids become immediately reusable.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    ranges: Vec<IdRange>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id. Ids start at 1; the gap below the lowest
    /// range is refilled from the top down before the space above the
    /// first range is touched.
    pub fn allocate(&mut self) -> Result<LocalId> {
        let Some(first) = self.ranges.first().copied() else {
            self.ranges.push(IdRange { min: 1, max: 1 });
            return Ok(1);
        };

        if first.min > 1 {
            let id = first.min - 1;
            self.ranges[0].min = id;
            return Ok(id);
        }

        // first.min == 1: grow above the first range.
        let id = first
            .max
            .checked_add(1)
            .ok_or(GraphError::AllocatorExhausted)?;

        match self.ranges.get(1).copied() {
            // Non-adjacency guarantees id < second.min; when the single
            // freed id between the two ranges is consumed, they merge.
            Some(second) if id + 1 == second.min => {
                self.ranges[0].max = second.max;
                self.ranges.remove(1);
            }
            _ => self.ranges[0].max = id,
        }
        Ok(id)
    }

    /// Returns `id` to the free pool, shrinking or splitting the range
    /// that holds it.
    pub fn free(&mut self, id: LocalId) -> Result<()> {
        let idx = self
            .position_of(id)
            .ok_or(GraphError::ElementNotFound("allocated id"))?;
        let range = self.ranges[idx];

        if range.min == range.max {
            self.ranges.remove(idx);
        } else if id == range.min {
            self.ranges[idx].min = id + 1;
        } else if id == range.max {
            self.ranges[idx].max = id - 1;
        } else {
            self.ranges[idx].max = id - 1;
            self.ranges.insert(
                idx + 1,
                IdRange {
                    min: id + 1,
                    max: range.max,
                },
            );
        }
        Ok(())
    }

    /// Whether `id` is currently allocated.
    pub fn contains(&self, id: LocalId) -> bool {
        self.position_of(id).is_some()
    }

    /// Number of allocated ids.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| (r.max - r.min) as usize + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterates every allocated id in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.ranges.iter().flat_map(|r| r.min..=r.max)
    }

    fn position_of(&self, id: LocalId) -> Option<usize> {
        let idx = self.ranges.partition_point(|r| r.max < id);
        let range = self.ranges.get(idx)?;
        (range.min <= id).then_some(idx)
    }

    #[cfg(test)]
    pub(crate) fn ranges(&self) -> &[IdRange] {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_minimal(alloc: &IdAllocator) {
        let ranges = alloc.ranges();
        for pair in ranges.windows(2) {
            assert!(pair[0].max < pair[1].min, "ranges out of order: {pair:?}");
            assert!(
                pair[0].max + 1 < pair[1].min,
                "adjacent ranges left unmerged: {pair:?}"
            );
        }
        for r in ranges {
            assert!(r.min <= r.max, "inverted range: {r:?}");
        }
    }

    #[test]
    fn first_allocation_is_one() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate().unwrap(), 1);
        assert!(alloc.contains(1));
        assert_eq!(alloc.len(), 1);
    }

    #[test]
    fn sequential_allocation_extends_first_range() {
        let mut alloc = IdAllocator::new();
        for expected in 1..=10 {
            assert_eq!(alloc.allocate().unwrap(), expected);
        }
        assert_eq!(alloc.ranges().len(), 1);
        assert_eq!(alloc.len(), 10);
    }

    #[test]
    fn freed_low_id_is_reissued_before_growth() {
        let mut alloc = IdAllocator::new();
        for _ in 0..5 {
            alloc.allocate().unwrap();
        }
        alloc.free(1).unwrap();
        alloc.free(2).unwrap();
        // Gap below the lowest range is filled top down.
        assert_eq!(alloc.allocate().unwrap(), 2);
        assert_eq!(alloc.allocate().unwrap(), 1);
        assert_eq!(alloc.allocate().unwrap(), 6);
    }

    #[test]
    fn interior_free_splits_and_realloc_merges() {
        let mut alloc = IdAllocator::new();
        for _ in 0..5 {
            alloc.allocate().unwrap();
        }
        alloc.free(3).unwrap();
        assert_eq!(alloc.ranges().len(), 2);
        assert!(!alloc.contains(3));

        // [1,2] + [4,5]: allocating grows the first range into the gap,
        // which rejoins the two ranges.
        assert_eq!(alloc.allocate().unwrap(), 3);
        assert_eq!(alloc.ranges().len(), 1);
        assert_minimal(&alloc);
    }

    #[test]
    fn freeing_boundaries_shrinks_range() {
        let mut alloc = IdAllocator::new();
        for _ in 0..4 {
            alloc.allocate().unwrap();
        }
        alloc.free(1).unwrap();
        alloc.free(4).unwrap();
        assert_eq!(alloc.ranges(), &[IdRange { min: 2, max: 3 }]);
    }

    #[test]
    fn freeing_unallocated_id_fails() {
        let mut alloc = IdAllocator::new();
        alloc.allocate().unwrap();
        assert!(alloc.free(7).is_err());
        assert!(alloc.free(0).is_err());
    }

    #[test]
    fn single_id_range_disappears_on_free() {
        let mut alloc = IdAllocator::new();
        alloc.allocate().unwrap();
        alloc.free(1).unwrap();
        assert!(alloc.is_empty());
        assert_eq!(alloc.allocate().unwrap(), 1);
    }

    proptest! {
        // Uniqueness of live ids and minimality of the range list under
        // arbitrary allocate/free interleavings.
        #[test]
        fn randomized_allocate_free_keeps_invariants(ops in proptest::collection::vec(0u8..3, 1..200)) {
            let mut alloc = IdAllocator::new();
            let mut live = std::collections::BTreeSet::new();

            for op in ops {
                if op < 2 || live.is_empty() {
                    let id = alloc.allocate().unwrap();
                    prop_assert!(live.insert(id), "id {id} issued while allocated");
                } else {
                    let victim = *live.iter().next().unwrap();
                    alloc.free(victim).unwrap();
                    live.remove(&victim);
                }
                assert_minimal(&alloc);
                prop_assert_eq!(alloc.len(), live.len());
            }

            for &id in &live {
                prop_assert!(alloc.contains(id));
            }
            let enumerated: Vec<_> = alloc.iter().collect();
            let expected: Vec<_> = live.iter().copied().collect();
            prop_assert_eq!(enumerated, expected);
        }
    }
}
