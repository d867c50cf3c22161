//=========================================================================
// Door State Machine
//=========================================================================
//
// Per-door open/closed state with an eased swing animation.
//
// Each door is independent. A toggle flips the logical state at once and
// starts a swing from the live angle toward the new target; toggling
// mid-swing simply starts a new swing from wherever the door is.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::config::DoorConfig;
use super::message_bus::MessageBus;
use super::notify::{DoorAngle, DoorToggled};

//=== DoorId ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DoorId(pub u32);

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "door#{}", self.0)
    }
}

//=== Door ================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Swing {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Swing {
    fn angle(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Door {
    open: bool,
    angle: f32,
    swing: Option<Swing>,
}

/// Cubic ease-in-out on [0, 1].
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

//=== DoorStateMachine ====================================================

pub struct DoorStateMachine {
    doors: BTreeMap<DoorId, Door>,
    open_angle: f32,
    swing_secs: f32,
}

impl DoorStateMachine {
    pub fn new(config: &DoorConfig) -> Self {
        Self {
            doors: BTreeMap::new(),
            open_angle: config.open_angle,
            swing_secs: config.swing_secs,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a closed door. Re-registering resets it.
    pub fn register(&mut self, id: DoorId) {
        if self.doors.insert(id, Door::default()).is_some() {
            warn!("Door {} was already registered and has been reset", id);
        }
    }

    /// Forgets every door.
    pub fn clear(&mut self) {
        self.doors.clear();
    }

    //--- Toggling ---------------------------------------------------------

    /// Flips a door and starts its swing. Returns the new open state, or
    /// `None` for an unknown door.
    pub fn toggle(&mut self, id: DoorId, bus: &mut MessageBus) -> Option<bool> {
        let Some(door) = self.doors.get_mut(&id) else {
            debug!("Toggle of unknown door {} ignored", id);
            return None;
        };

        door.open = !door.open;
        let target = if door.open { self.open_angle } else { 0.0 };

        // A partial swing takes proportionally less time.
        let distance = (target - door.angle).abs();
        let duration = self.swing_secs * (distance / self.open_angle).clamp(0.0, 1.0);

        door.swing = if duration > 0.0 {
            Some(Swing {
                from: door.angle,
                to: target,
                elapsed: 0.0,
                duration,
            })
        } else {
            door.angle = target;
            None
        };

        debug!("Door {} {}", id, if door.open { "opening" } else { "closing" });
        bus.publish(DoorToggled { door: id, open: door.open });
        Some(door.open)
    }

    //--- Per-Frame --------------------------------------------------------

    /// Advances all swings and publishes the angle of every moving door.
    pub fn update(&mut self, dt: f32, bus: &mut MessageBus) {
        for (&id, door) in self.doors.iter_mut() {
            let Some(swing) = door.swing.as_mut() else {
                continue;
            };

            swing.elapsed += dt;
            door.angle = swing.angle();
            if swing.finished() {
                door.angle = swing.to;
                door.swing = None;
            }

            bus.publish(DoorAngle { door: id, angle: door.angle });
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_open(&self, id: DoorId) -> Option<bool> {
        self.doors.get(&id).map(|d| d.open)
    }

    pub fn angle(&self, id: DoorId) -> Option<f32> {
        self.doors.get(&id).map(|d| d.angle)
    }

    pub fn is_animating(&self, id: DoorId) -> bool {
        self.doors.get(&id).is_some_and(|d| d.swing.is_some())
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const FRONT: DoorId = DoorId(1);
    const BACK: DoorId = DoorId(2);

    fn doors() -> DoorStateMachine {
        let mut doors = DoorStateMachine::new(&DoorConfig::default());
        doors.register(FRONT);
        doors.register(BACK);
        doors
    }

    fn run(doors: &mut DoorStateMachine, seconds: f32, bus: &mut MessageBus) {
        let steps = (seconds * 60.0).round() as usize;
        for _ in 0..steps {
            doors.update(1.0 / 60.0, bus);
        }
    }

    #[test]
    fn toggle_opens_with_eased_swing() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        assert_eq!(doors.toggle(FRONT, &mut bus), Some(true));
        assert_eq!(doors.angle(FRONT), Some(0.0));

        run(&mut doors, 0.3, &mut bus);
        let mid = doors.angle(FRONT).unwrap();
        assert!(mid > 0.0 && mid < FRAC_PI_2);

        run(&mut doors, 0.5, &mut bus);
        assert_eq!(doors.angle(FRONT), Some(FRAC_PI_2));
        assert!(!doors.is_animating(FRONT));
    }

    #[test]
    fn double_toggle_mid_swing_ends_closed() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        doors.toggle(FRONT, &mut bus);
        run(&mut doors, 0.1, &mut bus);
        doors.toggle(FRONT, &mut bus);

        assert_eq!(doors.is_open(FRONT), Some(false));
        run(&mut doors, 1.0, &mut bus);
        assert_eq!(doors.angle(FRONT), Some(0.0));
    }

    #[test]
    fn odd_toggles_end_open_regardless_of_timing() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        doors.toggle(FRONT, &mut bus);
        doors.toggle(FRONT, &mut bus);
        run(&mut doors, 0.05, &mut bus);
        doors.toggle(FRONT, &mut bus);
        run(&mut doors, 1.0, &mut bus);

        assert_eq!(doors.is_open(FRONT), Some(true));
        assert_eq!(doors.angle(FRONT), Some(FRAC_PI_2));
    }

    #[test]
    fn retoggle_starts_from_live_angle() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        doors.toggle(FRONT, &mut bus);
        run(&mut doors, 0.3, &mut bus);
        let live = doors.angle(FRONT).unwrap();

        doors.toggle(FRONT, &mut bus);
        doors.update(1.0 / 60.0, &mut bus);
        let next = doors.angle(FRONT).unwrap();

        assert!(next <= live);
        assert!(next > 0.0);
    }

    #[test]
    fn doors_are_independent() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        doors.toggle(FRONT, &mut bus);
        run(&mut doors, 1.0, &mut bus);

        assert_eq!(doors.is_open(BACK), Some(false));
        assert_eq!(doors.angle(BACK), Some(0.0));
    }

    #[test]
    fn unknown_door_is_ignored() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        assert_eq!(doors.toggle(DoorId(99), &mut bus), None);
        assert!(!bus.has::<DoorToggled>());
    }

    #[test]
    fn moving_doors_publish_angles() {
        let mut doors = doors();
        let mut bus = MessageBus::new();

        doors.toggle(BACK, &mut bus);
        doors.update(0.1, &mut bus);

        let angles = bus.read::<DoorAngle>();
        assert_eq!(angles.len(), 1);
        assert_eq!(angles[0].door, BACK);
    }
}
