//! Selection Policy — picks the next worry to show a reader.
//!
//! Biased toward worries the reader has not seen recently and toward worries
//! with fewer cheers, with a random pick inside a small window so the result
//! is not fully deterministic. Pure: history and RNG are passed in.

use std::collections::VecDeque;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::worry::CheeredWorry;

/// How many recently shown worry ids the reader's history keeps.
pub const HISTORY_LIMIT: usize = 10;

/// Smallest candidates window, unless the pool itself is smaller.
const MIN_WINDOW: usize = 3;

/// Recently shown worry ids, most recent first. Owned by the client and
/// round-tripped through each draw request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentHistory {
    ids: VecDeque<i32>,
}

impl RecentHistory {
    /// Builds a history from ids ordered most recent first. Anything past
    /// `HISTORY_LIMIT` is dropped.
    pub fn from_ids<I: IntoIterator<Item = i32>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().take(HISTORY_LIMIT).collect(),
        }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    /// Moves `id` to the front, evicting the oldest entry past the limit.
    pub fn record(&mut self, id: i32) {
        self.ids.retain(|&seen| seen != id);
        self.ids.push_front(id);
        self.ids.truncate(HISTORY_LIMIT);
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.ids.iter().copied().collect()
    }
}

/// `max(3, floor(0.3 * pool_len))`, capped at the pool size.
pub fn window_size(pool_len: usize) -> usize {
    (pool_len * 3 / 10).max(MIN_WINDOW).min(pool_len)
}

/// Returns the least-cheered candidates a draw picks from.
///
/// Algorithm:
/// 1. Drop worries present in `history`, unless that would drop all of them
/// 2. Sort ascending by cheer count (stable; ties keep input order)
/// 3. Keep the first `window_size(pool)` entries
pub fn candidate_window<'a>(
    worries: &'a [CheeredWorry],
    history: &RecentHistory,
) -> Vec<&'a CheeredWorry> {
    let unseen: Vec<&CheeredWorry> = worries
        .iter()
        .filter(|w| !history.contains(w.worry.id))
        .collect();

    let mut pool = if unseen.is_empty() {
        worries.iter().collect()
    } else {
        unseen
    };

    pool.sort_by_key(|w| w.cheer_count);
    pool.truncate(window_size(pool.len()));
    pool
}

/// Draws one worry and records it in `history`.
///
/// Returns `None` only when `worries` is empty.
pub fn draw_worry<'a, R: Rng + ?Sized>(
    worries: &'a [CheeredWorry],
    history: &mut RecentHistory,
    rng: &mut R,
) -> Option<&'a CheeredWorry> {
    let candidates = candidate_window(worries, history);
    let chosen = *candidates.choose(rng)?;
    history.record(chosen.worry.id);
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::worry::Worry;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn cheered(id: i32, cheer_count: i64) -> CheeredWorry {
        CheeredWorry {
            worry: Worry {
                id,
                content: format!("worry {id}"),
                nickname: "포근한 구름".to_string(),
                created_at: Utc::now(),
            },
            cheer_count,
        }
    }

    fn ids(window: &[&CheeredWorry]) -> Vec<i32> {
        window.iter().map(|w| w.worry.id).collect()
    }

    #[test]
    fn test_empty_store_draws_nothing() {
        let mut history = RecentHistory::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_worry(&[], &mut history, &mut rng).is_none());
        assert!(history.to_vec().is_empty(), "History untouched when nothing drawn");
    }

    #[test]
    fn test_single_worry_always_returned() {
        let worries = vec![cheered(7, 4)];
        let mut history = RecentHistory::from_ids([7, 1, 2]);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let drawn = draw_worry(&worries, &mut history, &mut rng).unwrap();
            assert_eq!(drawn.worry.id, 7);
        }
        assert_eq!(history.to_vec()[0], 7);
    }

    #[test]
    fn test_scenario_window_orders_by_cheers() {
        // A(0 cheers), B(3 cheers), C(1 cheer)
        let worries = vec![cheered(1, 0), cheered(2, 3), cheered(3, 1)];
        let window = candidate_window(&worries, &RecentHistory::default());
        assert_eq!(ids(&window), vec![1, 3, 2], "Sorted pool must be [A, C, B]");
    }

    #[test]
    fn test_scenario_every_member_reachable() {
        let worries = vec![cheered(1, 0), cheered(2, 3), cheered(3, 1)];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let mut history = RecentHistory::default();
            seen.insert(draw_worry(&worries, &mut history, &mut rng).unwrap().worry.id);
        }
        assert_eq!(seen, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(window_size(0), 0);
        assert_eq!(window_size(1), 1);
        assert_eq!(window_size(2), 2);
        assert_eq!(window_size(3), 3);
        assert_eq!(window_size(10), 3);
        assert_eq!(window_size(13), 3);
        assert_eq!(window_size(20), 6);
        assert_eq!(window_size(100), 30);
    }

    #[test]
    fn test_window_keeps_least_cheered() {
        let worries: Vec<_> = (1..=20).map(|id| cheered(id, (21 - id) as i64)).collect();
        let window = candidate_window(&worries, &RecentHistory::default());
        assert_eq!(ids(&window), vec![20, 19, 18, 17, 16, 15]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let worries = vec![cheered(5, 2), cheered(6, 2), cheered(7, 2), cheered(8, 2)];
        let window = candidate_window(&worries, &RecentHistory::default());
        assert_eq!(ids(&window), vec![5, 6, 7]);
    }

    #[test]
    fn test_history_excluded_while_unseen_remain() {
        let worries: Vec<_> = (1..=5).map(|id| cheered(id, 0)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut history = RecentHistory::from_ids([1, 2, 3, 4]);
            let drawn = draw_worry(&worries, &mut history, &mut rng).unwrap();
            assert_eq!(drawn.worry.id, 5, "Only unseen worry must be drawn");
        }
    }

    #[test]
    fn test_falls_back_to_full_set_when_all_seen() {
        let worries = vec![cheered(1, 5), cheered(2, 0)];
        let window = candidate_window(&worries, &RecentHistory::from_ids([1, 2]));
        assert_eq!(ids(&window), vec![2, 1]);
    }

    #[test]
    fn test_consecutive_draws_cycle_without_repeats() {
        let worries: Vec<_> = (1..=6).map(|id| cheered(id, 0)).collect();
        let mut history = RecentHistory::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut drawn = HashSet::new();
        for _ in 0..6 {
            let id = draw_worry(&worries, &mut history, &mut rng).unwrap().worry.id;
            assert!(drawn.insert(id), "Worry {id} repeated before the cycle completed");
        }
        assert_eq!(drawn.len(), 6);
    }

    #[test]
    fn test_history_truncated_to_limit() {
        let history = RecentHistory::from_ids(1..=15);
        assert_eq!(history.to_vec(), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_record_moves_to_front_and_evicts_oldest() {
        let mut history = RecentHistory::from_ids(1..=10);
        history.record(42);
        assert_eq!(history.to_vec().len(), HISTORY_LIMIT);
        assert_eq!(history.to_vec()[0], 42);
        assert!(!history.contains(10), "Oldest entry evicted");

        history.record(5);
        assert_eq!(history.to_vec()[0], 5);
        assert_eq!(history.to_vec().iter().filter(|&&id| id == 5).count(), 1);
    }
}
