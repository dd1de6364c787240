// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure run algorithms: greedy partition, normalization, rotation, padding.
//!
//! These operate on primary-axis extents only; mapping runs to rectangles
//! (cross offsets, placement, mirroring) happens in the engine.

use alloc::vec::Vec;

use trellis_extent::Scalar;

use crate::Run;

/// Greedily partitions `extents` into runs of at most `avail` primary extent.
///
/// Items are appended to the current run while they fit; an item that does
/// not fit starts a new run — unless it is the first item of its run: an
/// oversized single item never produces a spurious empty run, it simply
/// overflows. The result partitions `[0, len)` contiguously without gaps.
#[must_use]
pub fn partition_into_runs(extents: &[f64], avail: f64) -> Vec<Run> {
    let mut runs = Vec::new();
    if extents.is_empty() {
        return runs;
    }

    let mut start = 0;
    let mut used = 0.0;
    for (i, &extent) in extents.iter().enumerate() {
        let extent = extent.max(0.0);
        if i > start && used + extent > avail {
            runs.push(Run { start, end: i });
            start = i;
            used = 0.0;
        }
        used += extent;
    }
    runs.push(Run {
        start,
        end: extents.len(),
    });
    runs
}

/// Total primary extent of `run`.
#[must_use]
pub fn run_extent(run: Run, extents: &[f64]) -> f64 {
    extents[run.start..run.end].iter().map(|e| e.max(0.0)).sum()
}

/// Redistributes items so trailing runs are not much emptier than others.
///
/// Greedy packing can leave the last run nearly empty, which pads into very
/// fat tabs. Starting from the last run, the last item of the previous run is
/// pulled forward whenever the receiving run has generously more free space
/// than `max_item × weight`; the weight starts at 1.25 and grows by 0.25 each
/// time the scan wraps around, so later sweeps demand more free space and the
/// last run does not end up overfull.
///
/// The scan is explicitly bounded at `2 × run count` wraparounds: relying on
/// the growing weight alone to exceed every run's free space is not provably
/// bounded for adversarial size distributions.
pub fn normalize_runs(runs: &mut Vec<Run>, extents: &[f64], avail: f64, max_item: f64) {
    let run_count = runs.len();
    if run_count < 2 {
        return;
    }

    let mut weight = 1.25;
    let mut run = run_count - 1;
    let mut wraps = 0;
    let max_wraps = 2 * run_count;

    loop {
        let free = avail - run_extent(runs[run], extents);
        if free > max_item * weight && runs[run - 1].len() > 1 {
            // Pull the previous run's last item into this run.
            runs[run - 1].end -= 1;
            runs[run].start -= 1;
        } else if run == run_count - 1 {
            // The last run cannot absorb another item; a fixed point.
            break;
        }

        if run > 1 {
            run -= 1;
        } else {
            run = run_count - 1;
            weight += 0.25;
            wraps += 1;
            if wraps >= max_wraps {
                break;
            }
        }
    }
}

/// Display order of runs after rotating so `selected_run` comes first.
///
/// Rotation affects only paint order and cross-axis offset assignment, not
/// run membership: the selected run is drawn innermost (adjacent to the
/// content) and on top.
#[must_use]
pub fn rotated_order(run_count: usize, selected_run: usize) -> Vec<usize> {
    (0..run_count)
        .map(|i| (selected_run + i) % run_count.max(1))
        .collect()
}

/// Grows (or shrinks) every extent in a run so it exactly sums to `avail`.
///
/// Each item changes by `round(extent × delta / run_extent)`, preserving
/// relative ratios; the final item absorbs the integer rounding remainder so
/// the run sums to `avail` exactly, leaving no gap or overlap at the
/// trailing edge.
pub fn pad_run(extents: &mut [f64], avail: f64) {
    let Some((last, rest)) = extents.split_last_mut() else {
        return;
    };
    let total: f64 = rest.iter().map(|e| e.max(0.0)).sum::<f64>() + last.max(0.0);
    if total <= 0.0 {
        // Nothing to scale; the whole span goes to the last item.
        *last = avail.max(0.0);
        return;
    }

    let delta = avail - total;
    let mut used = 0.0;
    for extent in rest.iter_mut() {
        *extent += round_half_up(*extent * delta / total);
        used += *extent;
    }
    *last = (avail - used).max(0.0);
}

/// Rounds half away from zero toward positive infinity, like `Math.round`.
fn round_half_up(x: f64) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Layout extents are far below the mantissa limit"
    )]
    {
        (x + 0.5).floor_to_isize() as f64
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{normalize_runs, pad_run, partition_into_runs, rotated_order, run_extent};
    use crate::Run;

    fn spans(runs: &[Run]) -> Vec<(usize, usize)> {
        runs.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn empty_input_yields_no_runs() {
        assert!(partition_into_runs(&[], 100.0).is_empty());
    }

    #[test]
    fn seven_forty_wide_tabs_at_150_split_greedily() {
        // The golden partition: runs open at items 0, 3, and 6.
        let extents = [40.0; 7];
        let runs = partition_into_runs(&extents, 150.0);
        assert_eq!(spans(&runs), vec![(0, 3), (3, 6), (6, 7)]);
        assert_eq!(run_extent(runs[0], &extents), 120.0);
        assert_eq!(run_extent(runs[1], &extents), 120.0);
    }

    #[test]
    fn partition_covers_all_indices_without_gaps() {
        let extents = [35.0, 80.0, 12.0, 60.0, 60.0, 5.0, 90.0, 20.0];
        let runs = partition_into_runs(&extents, 100.0);
        let mut next = 0;
        for run in &runs {
            assert_eq!(run.start, next, "runs must be contiguous");
            assert!(run.start < run.end, "runs must be non-empty");
            next = run.end;
        }
        assert_eq!(next, extents.len());
    }

    #[test]
    fn oversized_single_item_overflows_in_place() {
        // One item wider than the line still forms its own run.
        let runs = partition_into_runs(&[200.0], 150.0);
        assert_eq!(spans(&runs), vec![(0, 1)]);

        // And never drags a spurious empty run in front of the next item.
        let runs = partition_into_runs(&[200.0, 10.0], 150.0);
        assert_eq!(spans(&runs), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn normalization_rebalances_the_golden_case() {
        let extents = [40.0; 7];
        let mut runs = partition_into_runs(&extents, 150.0);
        normalize_runs(&mut runs, &extents, 150.0, 40.0);
        // Deterministic fixed point of the weighted redistribution.
        assert_eq!(spans(&runs), vec![(0, 1), (1, 4), (4, 7)]);
    }

    #[test]
    fn normalization_preserves_the_partition_invariant() {
        let extents = [30.0, 70.0, 45.0, 25.0, 90.0, 15.0, 40.0, 40.0, 10.0];
        let mut runs = partition_into_runs(&extents, 120.0);
        normalize_runs(&mut runs, &extents, 120.0, 90.0);
        let mut next = 0;
        for run in &runs {
            assert_eq!(run.start, next, "runs must stay contiguous");
            assert!(run.start < run.end, "normalization must not empty a run");
            next = run.end;
        }
        assert_eq!(next, extents.len());
    }

    #[test]
    fn normalization_terminates_on_degenerate_extents() {
        // Zero-size items make every free-space check pass; the wrap budget
        // still bounds the scan.
        let extents = [0.0; 6];
        let mut runs = vec![
            Run { start: 0, end: 2 },
            Run { start: 2, end: 4 },
            Run { start: 4, end: 6 },
        ];
        normalize_runs(&mut runs, &extents, 100.0, 0.0);
        let covered: usize = runs.iter().map(Run::len).sum();
        assert_eq!(covered, 6);
    }

    #[test]
    fn rotation_is_cyclic_with_selected_first() {
        assert_eq!(rotated_order(4, 2), vec![2, 3, 0, 1]);
        assert_eq!(rotated_order(3, 0), vec![0, 1, 2]);
        assert_eq!(rotated_order(1, 0), vec![0]);
    }

    #[test]
    fn padding_conserves_the_available_extent_exactly() {
        let mut extents = [30.0, 30.0, 30.0];
        pad_run(&mut extents, 100.0);
        assert_eq!(extents.iter().sum::<f64>(), 100.0);
        // Proportional growth with the remainder on the last item.
        assert_eq!(extents, [33.0, 33.0, 34.0]);
    }

    #[test]
    fn padding_shrinks_overfull_runs() {
        let mut extents = [80.0, 120.0];
        pad_run(&mut extents, 150.0);
        assert_eq!(extents.iter().sum::<f64>(), 150.0);
        assert!(extents[0] < 80.0 && extents[1] < 120.0);
    }

    #[test]
    fn padding_zero_extents_degrades_to_last_item() {
        let mut extents = [0.0, 0.0];
        pad_run(&mut extents, 90.0);
        assert_eq!(extents, [0.0, 90.0]);
    }
}
