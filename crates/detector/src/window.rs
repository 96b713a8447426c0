use std::collections::VecDeque;

/// Given a timestamp-sorted run of `(index, ts)` pairs, find the first
/// point at which a trailing window of length `window_sec` accumulates
/// at least `threshold` items. Returns the indices in that window, or
/// `None` if the threshold is never reached. Only the first trigger is
/// reported — per rule semantics, the partition stops being scanned
/// once it fires.
pub fn first_window_trigger(items: &[(usize, i64)], window_sec: i64, threshold: usize) -> Option<Vec<usize>> {
    let mut buf: VecDeque<(usize, i64)> = VecDeque::new();
    for &(idx, ts) in items {
        buf.push_back((idx, ts));
        while let Some(&(_, front_ts)) = buf.front() {
            if ts - front_ts > window_sec {
                buf.pop_front();
            } else {
                break;
            }
        }
        if buf.len() >= threshold {
            return Some(buf.iter().map(|&(i, _)| i).collect());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_threshold_reached_within_window() {
        let items: Vec<(usize, i64)> = (0..10).map(|i| (i, i as i64 * 3)).collect();
        let fired = first_window_trigger(&items, 60, 5).unwrap();
        assert!(fired.len() >= 5);
        assert_eq!(fired[0], 0);
    }

    #[test]
    fn no_trigger_when_threshold_unreachable() {
        let items: Vec<(usize, i64)> = (0..3).map(|i| (i, i as i64 * 3)).collect();
        assert!(first_window_trigger(&items, 60, 5).is_none());
    }

    #[test]
    fn window_evicts_stale_entries() {
        // Five events, but spaced so the window never holds more than one at a time.
        let items: Vec<(usize, i64)> = vec![(0, 0), (1, 100), (2, 200), (3, 300), (4, 400)];
        assert!(first_window_trigger(&items, 10, 2).is_none());
    }
}
