//=========================================================================
// Message Bus
//=========================================================================
//
// Typed multi-consumer notification queues from the core to its
// collaborators (UI, audio, renderer).
//
// Architecture:
//   Game systems → publish<M>() → HashMap<TypeId, Vec<M>>
//                                      ↓
//   UI / audio / renderer  ←  read<M>() (shared, any number of readers)
//                                      ↓
//   Game ──────────────────→ clear_all() at the start of the next tick
//
// Pattern: publish → read (N consumers) → clear → repeat
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

//=== Message Trait =======================================================

/// Marker trait for types that can be published on the bus.
///
/// Automatically implemented for all types that are Send + 'static.
pub trait Message: Send + 'static {}

impl<T: Send + 'static> Message for T {}

//=== Queue Storage =======================================================

/// Type-erased view over a `Vec<M>` so queues of different message types
/// can share one map.
trait Queue: Send {
    /// Clears all messages while preserving allocated capacity.
    fn clear_queue(&mut self);

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Message> Queue for Vec<M> {
    fn clear_queue(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== MessageBus ==========================================================

/// Per-tick notification queues, one per message type.
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn Queue>>,
}

impl MessageBus {
    /// Creates a new empty message bus.
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    //--- Publishing -------------------------------------------------------

    /// Appends a message to the queue for its type.
    pub fn publish<M: Message>(&mut self, msg: M) {
        if let Some(queue) = self.queue_mut::<M>() {
            queue.push(msg);
        }
    }

    //--- Reading ----------------------------------------------------------

    /// Returns all messages of type M published since the last clear.
    ///
    /// Reading does not consume: every collaborator sees the same slice.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the most recent message of type M, if any.
    pub fn latest<M: Message>(&self) -> Option<&M> {
        self.read::<M>().last()
    }

    /// Returns the number of messages of type M currently queued.
    pub fn count<M: Message>(&self) -> usize {
        self.read::<M>().len()
    }

    /// Returns true if there are any messages of type M queued.
    pub fn has<M: Message>(&self) -> bool {
        self.count::<M>() > 0
    }

    /// Total number of queued messages across all types.
    pub fn total(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    //--- Clearing ---------------------------------------------------------

    /// Clears all messages of type M, preserving allocated capacity.
    pub fn clear<M: Message>(&mut self) {
        if let Some(queue) = self.queues.get_mut(&TypeId::of::<M>()) {
            queue.clear_queue();
        }
    }

    /// Clears every queue, keeping map entries and capacity for reuse.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear_queue();
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn queue_mut<M: Message>(&mut self) -> Option<&mut Vec<M>> {
        self.queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()))
            .as_any_mut()
            .downcast_mut::<Vec<M>>()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Clone)]
    struct Footstep {
        indoor: bool,
    }

    #[derive(Debug, PartialEq, Clone)]
    struct RoomName(String);

    #[test]
    fn new_bus_is_empty() {
        let bus = MessageBus::new();
        assert!(!bus.has::<Footstep>());
        assert_eq!(bus.total(), 0);
        assert!(bus.read::<Footstep>().is_empty());
    }

    #[test]
    fn publish_and_read_in_order() {
        let mut bus = MessageBus::new();
        bus.publish(Footstep { indoor: true });
        bus.publish(Footstep { indoor: false });

        let steps = bus.read::<Footstep>();
        assert_eq!(steps.len(), 2);
        assert!(steps[0].indoor);
        assert_eq!(bus.latest::<Footstep>(), Some(&Footstep { indoor: false }));
    }

    #[test]
    fn queues_are_separate_per_type() {
        let mut bus = MessageBus::new();
        bus.publish(Footstep { indoor: true });
        bus.publish(RoomName("Kitchen".to_string()));

        assert_eq!(bus.count::<Footstep>(), 1);
        assert_eq!(bus.count::<RoomName>(), 1);
        assert_eq!(bus.total(), 2);
    }

    #[test]
    fn multiple_readers_see_same_messages() {
        let mut bus = MessageBus::new();
        bus.publish(RoomName("Garage".to_string()));

        let ui = bus.read::<RoomName>();
        let audio = bus.read::<RoomName>();
        assert_eq!(ui, audio);
    }

    #[test]
    fn clear_removes_only_one_type() {
        let mut bus = MessageBus::new();
        bus.publish(Footstep { indoor: true });
        bus.publish(RoomName("Hallway".to_string()));

        bus.clear::<Footstep>();
        assert!(!bus.has::<Footstep>());
        assert!(bus.has::<RoomName>());
    }

    #[test]
    fn clear_all_then_publish_again() {
        let mut bus = MessageBus::new();
        for _ in 0..10 {
            bus.publish(Footstep { indoor: false });
        }

        bus.clear_all();
        assert_eq!(bus.total(), 0);

        bus.publish(Footstep { indoor: true });
        assert_eq!(bus.count::<Footstep>(), 1);
    }
}
