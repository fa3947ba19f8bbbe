use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::DataRange;
use crate::core::spacing::{align_down, align_up};

pub(super) type Candidates = SmallVec<[(f64, f64); 4]>;

/// Trace of recorded best totals; strictly decreasing.
pub type ImprovementTrace = SmallVec<[f64; 8]>;

/// Axis extensions `{aligned start, data.lo} x {data.hi, aligned end}`.
///
/// Duplicates are dropped and the remainder is ordered tightest-first, so that
/// a strict "lower total wins" scan prefers the tighter fit on ties.
pub(super) fn extension_candidates(range: DataRange, spacing: f64) -> Candidates {
    let aligned_start = align_down(range.lo(), spacing);
    let aligned_end = align_up(range.hi(), spacing);

    let mut unique: IndexSet<(OrderedFloat<f64>, OrderedFloat<f64>)> = IndexSet::with_capacity(4);
    for start in [range.lo(), aligned_start] {
        for end in [range.hi(), aligned_end] {
            unique.insert((OrderedFloat(start), OrderedFloat(end)));
        }
    }

    let mut candidates: Candidates = unique
        .into_iter()
        .map(|(start, end)| (start.into_inner(), end.into_inner()))
        .collect();
    candidates.sort_by(|left, right| (left.1 - left.0).total_cmp(&(right.1 - right.0)));
    candidates
}

/// Start positions for a window of fixed `length` that should cover `range`.
///
/// Offered in order: centred on the data, centred start snapped down to a
/// tick, flush with the data start, and end snapped up to a tick.
pub(super) fn fixed_length_starts(
    range: DataRange,
    length: f64,
    spacing: f64,
) -> SmallVec<[f64; 4]> {
    let centred = range.midpoint() - 0.5 * length;
    let mut unique: IndexSet<OrderedFloat<f64>> = IndexSet::with_capacity(4);
    for start in [
        centred,
        align_down(centred, spacing),
        range.lo(),
        align_up(range.hi(), spacing) - length,
    ] {
        if start.is_finite() {
            unique.insert(OrderedFloat(start));
        }
    }
    unique.into_iter().map(OrderedFloat::into_inner).collect()
}

/// Counts consecutive outer iterations that failed to improve the best.
///
/// Iterations before the first feasible candidate do not count, so coarse
/// spacings that cannot fit two ticks never end a search early.
#[derive(Debug, Clone, Copy)]
pub(super) struct StallCounter {
    limit: u32,
    stalled: u32,
}

impl StallCounter {
    pub(super) fn new(limit: u32) -> Self {
        Self { limit, stalled: 0 }
    }

    /// Records one outer iteration; returns `true` when the search should stop.
    pub(super) fn observe(&mut self, improved: bool, has_best: bool) -> bool {
        if improved {
            self.stalled = 0;
        } else if has_best {
            self.stalled += 1;
        }
        self.stalled >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::{StallCounter, extension_candidates, fixed_length_starts};
    use crate::core::DataRange;

    #[test]
    fn extension_candidates_are_deduplicated_and_tightest_first() {
        let range = DataRange::new(1.0, 9.0).expect("range");
        let candidates = extension_candidates(range, 5.0);
        assert_eq!(
            candidates.as_slice(),
            &[(1.0, 9.0), (1.0, 10.0), (0.0, 9.0), (0.0, 10.0)]
        );

        let aligned = DataRange::new(0.0, 10.0).expect("range");
        assert_eq!(extension_candidates(aligned, 5.0).as_slice(), &[(0.0, 10.0)]);
    }

    #[test]
    fn fixed_length_starts_prefer_centred_window() {
        let range = DataRange::new(2.0, 6.0).expect("range");
        let starts = fixed_length_starts(range, 8.0, 1.0);
        assert_eq!(starts[0], 0.0);
        assert!(starts.contains(&2.0));
        assert!(starts.contains(&-2.0));
    }

    #[test]
    fn stall_counter_ignores_iterations_without_a_best() {
        let mut counter = StallCounter::new(2);
        assert!(!counter.observe(false, false));
        assert!(!counter.observe(false, false));
        assert!(!counter.observe(true, true));
        assert!(!counter.observe(false, true));
        assert!(!counter.observe(true, true));
        assert!(!counter.observe(false, true));
        assert!(counter.observe(false, true));
    }
}
