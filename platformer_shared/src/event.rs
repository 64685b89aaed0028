//! Controller events delivered between frames.
//!
//! The host's key-down callback is not synchronized to the frame loop. Instead
//! of registering with an engine, the host pushes events here and drains the
//! queue right before the next controller step, so a press recorded at any
//! point between two steps is seen by the second one.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Edge-triggered input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControllerEvent {
    /// The jump key went down at `at_ms` on the host clock.
    JumpPressed { at_ms: f64 },
}

/// FIFO of events waiting for the next frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<ControllerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an event into the queue.
    pub fn push(&mut self, event: ControllerEvent) {
        self.pending.push_back(event);
    }

    /// Takes every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = ControllerEvent> + '_ {
        self.pending.drain(..)
    }

    /// Drops every queued event.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut q = EventQueue::new();
        q.push(ControllerEvent::JumpPressed { at_ms: 10.0 });
        q.push(ControllerEvent::JumpPressed { at_ms: 12.0 });
        assert_eq!(q.len(), 2);

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(
            drained,
            vec![
                ControllerEvent::JumpPressed { at_ms: 10.0 },
                ControllerEvent::JumpPressed { at_ms: 12.0 },
            ]
        );
        assert!(q.is_empty());
    }
}
