//! Bounded experience replay memory
//!
//! Transitions are kept in arrival order; once capacity is reached the oldest
//! one is dropped for each new push. Sampling draws without replacement.

use rand::{Rng, seq::index};
use std::collections::VecDeque;

use super::trainer::Transition;

/// FIFO replay memory
///
/// # Example
///
/// ```rust
/// use q_snake::game::RelativeAction;
/// use q_snake::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2);
/// for reward in [1.0, 2.0, 3.0] {
///     memory.push(Transition::new(vec![0.0], RelativeAction::Straight, reward, vec![0.0], false));
/// }
///
/// assert_eq!(memory.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Add a transition, evicting the oldest when full
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Up to `batch_size` distinct transitions in random order; everything
    /// stored when fewer are available.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, batch_size: usize) -> Vec<Transition> {
        if self.buffer.len() <= batch_size {
            return self.buffer.iter().cloned().collect();
        }

        index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|idx| self.buffer[idx].clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
