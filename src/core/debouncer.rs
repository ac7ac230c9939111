/*
 * Coalesces rapid recount requests per document. Each key holds at most one
 * pending deadline; scheduling the same key again cancels the earlier request
 * and starts a fresh delay window. The host drives time explicitly through
 * `take_due`, which keeps the orchestrator single-threaded and lets tests step
 * the clock without sleeping.
 */
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone + Ord> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: HashMap::new(),
        }
    }

    /*
     * Schedules `key` to fire `delay` after `now`, replacing any pending
     * deadline for the same key. Returns true when an earlier request was
     * cancelled.
     */
    pub fn schedule(&mut self, key: K, now: Instant) -> bool {
        self.pending.insert(key, now + self.delay).is_some()
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /*
     * Removes and returns every key whose deadline is at or before `now`,
     * ordered by deadline (ties broken by key) so firing order is stable.
     */
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, key.clone()))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_nothing_fires_before_the_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a.md".to_string(), start);

        assert!(debouncer.take_due(start + Duration::from_millis(499)).is_empty());
        assert_eq!(debouncer.pending_count(), 1);
        assert_eq!(debouncer.take_due(start + DELAY), vec!["a.md".to_string()]);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[test]
    fn test_rescheduling_cancels_the_earlier_request() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert!(!debouncer.schedule("a.md", start));
        assert!(debouncer.schedule("a.md", start + Duration::from_millis(300)));

        // The first deadline has passed but was replaced.
        assert!(debouncer.take_due(start + DELAY).is_empty());
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(800)),
            vec!["a.md"]
        );
        // Fired once only.
        assert!(debouncer.take_due(start + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_keys_are_debounced_independently() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("b.md", start + Duration::from_millis(100));
        debouncer.schedule("a.md", start);
        debouncer.schedule("c.md", start + Duration::from_millis(900));

        assert_eq!(
            debouncer.next_deadline(),
            Some(start + DELAY),
            "earliest deadline belongs to a.md"
        );
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(600)),
            vec!["a.md", "b.md"]
        );
        assert!(debouncer.cancel(&"c.md"));
        assert!(!debouncer.cancel(&"c.md"));
        assert_eq!(debouncer.pending_count(), 0);
    }
}
