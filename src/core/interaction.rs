//=========================================================================
// Interaction Resolver
//=========================================================================
//
// Throttled forward raycast deciding what the player is looking at.
//
// Architecture:
//   tick → update(now, eye, dir)
//            ├─ Throttle (interval on the monotonic clock)
//            ├─ World::pick_forward(filter = node is indexed)
//            ├─ EntityIndex::resolve(node) → Interactable
//            └─ on change → FocusChanged
//
// A miss, or a hit on untagged geometry, simply means "no focus".
// Discrete actions call `refresh` to act on the freshest target.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec3;
use log::trace;

//=== Internal Dependencies ===============================================

use super::clock::Throttle;
use super::config::InteractionConfig;
use super::entity_index::{EntityIndex, Interactable};
use super::message_bus::MessageBus;
use super::notify::FocusChanged;
use super::world::World;

//=== InteractionResolver =================================================

pub struct InteractionResolver {
    throttle: Throttle,
    reach: f32,
    focus: Option<Interactable>,
}

impl InteractionResolver {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            throttle: Throttle::from_secs(config.interval_secs),
            reach: config.reach,
            focus: None,
        }
    }

    /// What an unthrottled pick would return right now.
    pub fn resolve(&self, eye: Vec3, direction: Vec3, world: &dyn World, index: &EntityIndex) -> Option<Interactable> {
        world
            .pick_forward(eye, direction, self.reach, &|node| index.contains(node))
            .and_then(|node| index.resolve(node))
    }

    /// Throttled focus update. Returns `true` if the focus changed.
    pub fn update(
        &mut self,
        now: Duration,
        eye: Vec3,
        direction: Vec3,
        world: &dyn World,
        index: &EntityIndex,
        bus: &mut MessageBus,
    ) -> bool {
        if !self.throttle.ready(now) {
            return false;
        }
        self.set_focus(self.resolve(eye, direction, world, index), bus)
    }

    /// Immediate re-pick, for discrete actions.
    pub fn refresh(
        &mut self,
        eye: Vec3,
        direction: Vec3,
        world: &dyn World,
        index: &EntityIndex,
        bus: &mut MessageBus,
    ) -> Option<Interactable> {
        let focus = self.resolve(eye, direction, world, index);
        self.set_focus(focus, bus);
        focus
    }

    /// Drops the focus, e.g. when its entity was removed.
    pub fn clear(&mut self, bus: &mut MessageBus) {
        self.set_focus(None, bus);
        self.throttle.reset();
    }

    fn set_focus(&mut self, focus: Option<Interactable>, bus: &mut MessageBus) -> bool {
        if focus == self.focus {
            return false;
        }
        trace!("Focus {:?} -> {:?}", self.focus, focus);
        self.focus = focus;
        bus.publish(FocusChanged { focus });
        true
    }

    pub fn focus(&self) -> Option<Interactable> {
        self.focus
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::doors::DoorId;
    use crate::core::world::{HeadlessWorld, NodeId};

    const EYE: Vec3 = Vec3::new(0.0, 1.7, 0.0);
    const DOOR: Interactable = Interactable::Door(DoorId(1));

    fn setup() -> (InteractionResolver, HeadlessWorld, EntityIndex, MessageBus) {
        let mut world = HeadlessWorld::new();
        // Door frame node (untagged) in front of the handle node
        world.add_pickable(NodeId::Scene(10), Vec3::new(0.0, 1.7, 1.0), 0.2);
        world.add_pickable(NodeId::Scene(11), Vec3::new(0.0, 1.7, 2.0), 0.2);

        let mut index = EntityIndex::new();
        index.register(DOOR, [NodeId::Scene(11)]);

        (InteractionResolver::new(&InteractionConfig::default()), world, index, MessageBus::new())
    }

    #[test]
    fn untagged_geometry_is_skipped() {
        let (resolver, world, index, _) = setup();
        assert_eq!(resolver.resolve(EYE, Vec3::Z, &world, &index), Some(DOOR));
    }

    #[test]
    fn out_of_reach_is_no_focus() {
        let (resolver, world, index, _) = setup();
        assert_eq!(resolver.resolve(EYE, -Vec3::Z, &world, &index), None);

        let far = EYE - Vec3::Z * 1.0;
        assert_eq!(resolver.resolve(far, Vec3::Z, &world, &index), None);
    }

    #[test]
    fn focus_change_is_published_once() {
        let (mut resolver, world, index, mut bus) = setup();

        assert!(resolver.update(Duration::ZERO, EYE, Vec3::Z, &world, &index, &mut bus));
        assert!(!resolver.update(Duration::from_millis(200), EYE, Vec3::Z, &world, &index, &mut bus));

        assert_eq!(bus.count::<FocusChanged>(), 1);
        assert!(resolver.has_focus());
    }

    #[test]
    fn update_is_throttled() {
        let (mut resolver, world, index, mut bus) = setup();
        resolver.update(Duration::ZERO, EYE, -Vec3::Z, &world, &index, &mut bus);

        // Looking at the door 50 ms later is not noticed yet
        assert!(!resolver.update(Duration::from_millis(50), EYE, Vec3::Z, &world, &index, &mut bus));
        assert!(!resolver.has_focus());

        assert!(resolver.update(Duration::from_millis(150), EYE, Vec3::Z, &world, &index, &mut bus));
        assert_eq!(resolver.focus(), Some(DOOR));
    }

    #[test]
    fn refresh_bypasses_throttle() {
        let (mut resolver, world, index, mut bus) = setup();
        resolver.update(Duration::ZERO, EYE, -Vec3::Z, &world, &index, &mut bus);

        assert_eq!(resolver.refresh(EYE, Vec3::Z, &world, &index, &mut bus), Some(DOOR));
    }
}
