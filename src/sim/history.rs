use std::collections::VecDeque;

use crate::dynamics::state::State;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Append-only state history
// ---------------------------------------------------------------------------

/// Time-ordered record of a session's states.
///
/// Stored oldest-first; the head is the newest state. Entries are never
/// mutated once appended. With a retention window, states older than
/// `head.time - retention` are dropped (the head is always kept).
#[derive(Debug, Clone, Default)]
pub struct StateHistory {
    states: VecDeque<State>,
    retention: Option<f64>,
}

impl StateHistory {
    pub fn new(initial: State, retention: Option<f64>) -> Result<Self> {
        let mut history = Self { states: VecDeque::new(), retention };
        history.push(initial)?;
        Ok(history)
    }

    /// Append a state at the head. Storage growth failure is reported, not aborted on.
    pub fn push(&mut self, state: State) -> Result<()> {
        debug_assert!(
            self.head().map_or(true, |h| state.time > h.time),
            "history timestamps must strictly increase"
        );
        self.states.try_reserve(1)?;
        self.states.push_back(state);
        Ok(())
    }

    /// Reserve room for `additional` states up front.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.states.try_reserve(additional)?;
        Ok(())
    }

    pub fn head(&self) -> Option<&State> {
        self.states.back()
    }

    pub fn oldest(&self) -> Option<&State> {
        self.states.front()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn retention(&self) -> Option<f64> {
        self.retention
    }

    /// Newest first, as drawn by a trajectory trail.
    pub fn iter_newest_first(&self) -> impl DoubleEndedIterator<Item = &State> {
        self.states.iter().rev()
    }

    /// Oldest first, in time order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &State> {
        self.states.iter()
    }

    /// Owned copy in time order.
    pub fn to_vec(&self) -> Vec<State> {
        self.states.iter().copied().collect()
    }

    /// Drop states that fall outside the retention window. Returns the count removed.
    pub fn prune(&mut self) -> usize {
        let (Some(window), Some(head)) = (self.retention, self.head()) else {
            return 0;
        };
        let cutoff = head.time - window;
        let mut removed = 0;
        while self.states.len() > 1 && self.states.front().is_some_and(|s| s.time < cutoff) {
            self.states.pop_front();
            removed += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn at(t: f64) -> State {
        State::new(t, Vector2::new(t, 100.0 - t), Vector2::zeros(), 1900.0)
    }

    #[test]
    fn head_is_newest() {
        let mut h = StateHistory::new(at(0.0), None).unwrap();
        h.push(at(0.5)).unwrap();
        h.push(at(1.0)).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(h.head().unwrap().time, 1.0);
        assert_eq!(h.oldest().unwrap().time, 0.0);
        let times: Vec<f64> = h.iter_newest_first().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn unbounded_history_is_never_pruned() {
        let mut h = StateHistory::new(at(0.0), None).unwrap();
        for i in 1..100 {
            h.push(at(i as f64)).unwrap();
        }
        assert_eq!(h.prune(), 0);
        assert_eq!(h.len(), 100);
    }

    #[test]
    fn retention_drops_old_states() {
        let mut h = StateHistory::new(at(0.0), Some(2.5)).unwrap();
        for i in 1..=10 {
            h.push(at(i as f64)).unwrap();
        }
        let removed = h.prune();
        // cutoff = 7.5, keeps 8, 9, 10
        assert_eq!(removed, 8);
        assert_eq!(h.len(), 3);
        assert_eq!(h.oldest().unwrap().time, 8.0);
        assert_eq!(h.head().unwrap().time, 10.0);
    }

    #[test]
    fn retention_keeps_head() {
        let mut h = StateHistory::new(at(0.0), Some(1e-6)).unwrap();
        h.push(at(5.0)).unwrap();
        h.prune();
        assert_eq!(h.len(), 1);
        assert_eq!(h.head().unwrap().time, 5.0);
    }
}
