/// Merge overlapping or touching `[start, end]` intervals (closed on both
/// ends, so two intervals that merely touch at a point are merged too, per
/// the detector/correlator's own "touching" sweep convention).
///
/// Input need not be sorted. Output is sorted by start and pairwise
/// disjoint — merging an already-merged list is a no-op (idempotent).
pub fn merge_intervals(mut intervals: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    if intervals.is_empty() {
        return Vec::new();
    }
    intervals.sort_by_key(|&(start, _)| start);

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some((_, cur_end)) if start <= *cur_end => {
                *cur_end = (*cur_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Sum of `[start, end]` lengths across a merged interval list.
pub fn total_length(intervals: &[(i64, i64)]) -> i64 {
    intervals.iter().map(|&(s, e)| e - s).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_overlapping_intervals() {
        let merged = merge_intervals(vec![(0, 10), (5, 15)]);
        assert_eq!(merged, vec![(0, 15)]);
    }

    #[test]
    fn merges_touching_intervals() {
        let merged = merge_intervals(vec![(0, 10), (10, 20)]);
        assert_eq!(merged, vec![(0, 20)]);
    }

    #[test]
    fn leaves_disjoint_intervals_separate() {
        let merged = merge_intervals(vec![(0, 5), (100, 110)]);
        assert_eq!(merged, vec![(0, 5), (100, 110)]);
    }

    #[test]
    fn idempotent_on_already_merged_input() {
        let once = merge_intervals(vec![(0, 10), (5, 15), (20, 25)]);
        let twice = merge_intervals(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_is_sorted_and_disjoint() {
        let merged = merge_intervals(vec![(50, 60), (0, 5), (10, 20), (18, 30)]);
        for pair in merged.windows(2) {
            assert!(pair[0].1 < pair[1].0);
            assert!(pair[0].0 <= pair[0].1);
        }
    }

    #[test]
    fn the_downtime_merging_scenario() {
        // 10:00:30-10:10:00 and 10:05:30-10:15:00 merge into one interval
        // spanning 10:00:30-10:15:00 (870 seconds).
        let merged = merge_intervals(vec![(30, 600), (330, 900)]);
        assert_eq!(merged, vec![(30, 900)]);
        assert_eq!(total_length(&merged), 870);
    }
}
