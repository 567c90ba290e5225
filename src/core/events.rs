//! Event queue for AI notifications
//!
//! The behavior controller reports what its enemies noticed and decided
//! through a double-buffered queue. Events pushed during a tick become
//! readable after the swap at the end of that tick and stay readable until
//! the next one, so consumers (audio, UI, debug overlays) see a consistent
//! batch regardless of update order.
//!
//! # Example
//!
//! ```ignore
//! controller.update(dt, &mut world, &physics);
//!
//! for event in controller.events().iter() {
//!     if let AiEvent::PlayerSpotted { entity, .. } = event {
//!         play_alert_sound(*entity);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

use crate::ai::Branch;

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened to an enemy during a tick.
///
/// The `#[non_exhaustive]` attribute allows adding new variants without
/// breaking downstream code that uses wildcard patterns.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AiEvent {
    /// The enemy saw the player after not seeing it on its previous look.
    PlayerSpotted {
        entity: Entity,
        /// World point where the sight ray hit the player
        at: Vec2,
    },

    /// The enemy looked and no longer sees the player.
    PlayerLost {
        entity: Entity,
        /// Remembered location of the player
        last_seen: Option<Vec2>,
    },

    /// The enemy executed a different branch than on its previous tick.
    BranchChanged {
        entity: Entity,
        /// Previous branch, `None` on the first decision
        from: Option<Branch>,
        to: Branch,
    },

    /// A patroller reached a route waypoint.
    WaypointReached {
        entity: Entity,
        /// Index of the waypoint that was reached
        index: usize,
    },

    /// A sentry rotated on its cooldown.
    SentryTurned {
        entity: Entity,
        /// New facing direction
        facing: Vec2,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for tick-consistent event processing.
///
/// # Performance
///
/// - Push: O(1) amortized
/// - Iteration: O(n)
/// - Swap: O(1)
#[derive(Debug)]
pub struct EventQueue<E = AiEvent> {
    /// Events being written this tick
    pending: VecDeque<E>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<E>,
}

impl<E> EventQueue<E> {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next tick.
    ///
    /// Events are not immediately visible to iterators. Call `swap()`
    /// at the tick boundary to make them available.
    #[inline]
    pub fn push(&mut self, event: E) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// After swapping:
    /// - `iter()` returns events from the previous tick
    /// - `push()` writes to the new pending queue
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.processing.iter()
    }

    /// Drain all events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next tick.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    #[test]
    fn test_event_queue_push_and_swap() {
        let entity = test_entity();
        let mut queue = EventQueue::new();

        queue.push(AiEvent::WaypointReached { entity, index: 2 });
        assert!(queue.is_empty(), "Events should not be visible before swap");

        queue.swap();
        assert_eq!(queue.len(), 1);

        let events: Vec<_> = queue.iter().collect();
        assert!(matches!(
            events[0],
            AiEvent::WaypointReached { index: 2, .. }
        ));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let entity = test_entity();
        let mut queue = EventQueue::new();

        queue.push(AiEvent::WaypointReached { entity, index: 1 });
        queue.swap();

        queue.push(AiEvent::WaypointReached { entity, index: 2 });

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            AiEvent::WaypointReached { index: 1, .. }
        ));

        queue.swap();
        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            AiEvent::WaypointReached { index: 2, .. }
        ));
    }

    #[test]
    fn test_event_queue_drain_and_clear() {
        let entity = test_entity();
        let mut queue = EventQueue::new();

        queue.push(AiEvent::SentryTurned {
            entity,
            facing: Vec2::X,
        });
        queue.push(AiEvent::BranchChanged {
            entity,
            from: None,
            to: Branch::Default,
        });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());

        queue.push(AiEvent::PlayerLost {
            entity,
            last_seen: None,
        });
        queue.clear();
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_generic_payload() {
        let mut queue: EventQueue<u32> = EventQueue::with_capacity(4);
        queue.push(7);
        queue.swap();
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![7]);
    }
}
