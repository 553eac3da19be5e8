//! Bounded tabu list.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// FIFO queue of recent items with a set for O(1) lookup. Holds at most
/// `capacity` items; pushing a held item moves it to the back.
#[derive(Debug, Clone)]
pub(crate) struct TabuList<T> {
    capacity: usize,
    queue: VecDeque<T>,
    members: HashSet<T>,
}

impl<T: Clone + Eq + Hash> TabuList<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.members.contains(&item) {
            self.queue.retain(|held| held != &item);
        } else if self.queue.len() >= self.capacity {
            if let Some(oldest) = self.queue.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.queue.push_back(item.clone());
        self.members.insert(item);
    }

    pub(crate) fn contains(&self, item: &T) -> bool {
        self.members.contains(item)
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut tabu = TabuList::new(2);
        tabu.push(1);
        tabu.push(2);
        tabu.push(3);
        assert_eq!(tabu.len(), 2);
        assert!(!tabu.contains(&1));
        assert!(tabu.contains(&2));
        assert!(tabu.contains(&3));
    }

    #[test]
    fn test_repeated_push_refreshes() {
        let mut tabu = TabuList::new(2);
        tabu.push(1);
        tabu.push(2);
        tabu.push(1);
        tabu.push(3);
        assert!(tabu.contains(&1));
        assert!(!tabu.contains(&2));
        assert_eq!(tabu.len(), 2);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut tabu = TabuList::new(0);
        tabu.push(1);
        assert!(!tabu.contains(&1));
        assert_eq!(tabu.len(), 0);
    }
}
