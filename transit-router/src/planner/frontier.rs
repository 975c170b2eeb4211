//! Min-priority queue over search labels.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

/// Frontier of labels ordered by priority, lowest first.
///
/// Labels are identified by their index in the search's label arena. Equal
/// priorities pop in push order because indices only grow.
#[derive(Debug, Default)]
pub(super) struct Frontier {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>>,
}

impl Frontier {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, priority: f64, label: usize) {
        self.heap.push(Reverse((OrderedFloat(priority), label)));
    }

    pub(super) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse((_, label))| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_priority_first() {
        let mut f = Frontier::new();
        f.push(5.0, 0);
        f.push(1.0, 1);
        f.push(3.0, 2);

        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(2));
        assert_eq!(f.pop(), Some(0));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn ties_pop_in_push_order() {
        let mut f = Frontier::new();
        f.push(2.0, 0);
        f.push(2.0, 1);
        f.push(2.0, 2);

        assert_eq!(f.pop(), Some(0));
        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(2));
    }
}
