//=========================================================================
// Room Occupancy
//=========================================================================
//
// Tracks which room of the generated floor plan the player stands in.
//
// Architecture:
//   tick → RoomOccupancyTracker::update(now, position)
//            ├─ Throttle (monotonic clock, not frame count)
//            ├─ locate(): first rectangle containing (x, z) wins
//            └─ on change → RoomChanged
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

use glam::Vec3;
use log::debug;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::clock::Throttle;
use super::message_bus::MessageBus;
use super::notify::RoomChanged;

//=== RoomKind ============================================================

/// Semantic room type; drives ambient audio and UI naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    LivingRoom,
    Kitchen,
    DiningRoom,
    Bedroom,
    Bathroom,
    Hallway,
    Office,
    Garage,
    Basement,
    Attic,
    Storage,
}

impl RoomKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::DiningRoom => "Dining Room",
            Self::Bedroom => "Bedroom",
            Self::Bathroom => "Bathroom",
            Self::Hallway => "Hallway",
            Self::Office => "Office",
            Self::Garage => "Garage",
            Self::Basement => "Basement",
            Self::Attic => "Attic",
            Self::Storage => "Storage",
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== Room ================================================================

/// Axis-aligned floor rectangle. `(x, z)` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Room {
    pub id: u32,
    pub kind: RoomKind,
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Room {
    pub fn new(id: u32, kind: RoomKind, x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self { id, kind, x, z, width, depth }
    }

    /// Inclusive containment on the horizontal plane.
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.x
            && position.x <= self.x + self.width
            && position.z >= self.z
            && position.z <= self.z + self.depth
    }
}

//=== Location ============================================================

/// Where the player is relative to the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    Outside,
    Inside { room: u32, kind: RoomKind },
}

impl Location {
    pub fn is_indoor(&self) -> bool {
        matches!(self, Self::Inside { .. })
    }

    pub fn kind(&self) -> Option<RoomKind> {
        match self {
            Self::Inside { kind, .. } => Some(*kind),
            Self::Outside => None,
        }
    }

    /// Display name, `"Outside"` when no room contains the player.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inside { kind, .. } => kind.name(),
            Self::Outside => "Outside",
        }
    }
}

//=== RoomOccupancyTracker ================================================

pub struct RoomOccupancyTracker {
    rooms: Vec<Room>,
    current: Location,
    throttle: Throttle,
}

impl RoomOccupancyTracker {
    pub fn new(rooms: Vec<Room>, interval: Duration) -> Self {
        Self {
            rooms,
            current: Location::Outside,
            throttle: Throttle::new(interval),
        }
    }

    /// Containing room for `position`; list order breaks ties.
    pub fn locate(&self, position: Vec3) -> Location {
        self.rooms
            .iter()
            .find(|room| room.contains(position))
            .map_or(Location::Outside, |room| Location::Inside {
                room: room.id,
                kind: room.kind,
            })
    }

    /// Throttled check. Returns the new location if it changed.
    pub fn update(&mut self, now: Duration, position: Vec3, bus: &mut MessageBus) -> Option<Location> {
        if !self.throttle.ready(now) {
            return None;
        }

        let location = self.locate(position);
        if location == self.current {
            return None;
        }

        debug!("Room {} -> {}", self.current.name(), location.name());
        self.current = location;
        bus.publish(RoomChanged { location });
        Some(location)
    }

    pub fn current(&self) -> Location {
        self.current
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> RoomOccupancyTracker {
        RoomOccupancyTracker::new(
            vec![
                Room::new(1, RoomKind::Kitchen, 0.0, 0.0, 4.0, 4.0),
                Room::new(2, RoomKind::Hallway, 4.0, 0.0, 2.0, 8.0),
                Room::new(3, RoomKind::Bedroom, 0.0, 0.0, 10.0, 10.0),
            ],
            Duration::from_millis(250),
        )
    }

    #[test]
    fn point_inside_single_room() {
        let tracker = tracker();
        assert_eq!(
            tracker.locate(Vec3::new(5.0, 1.0, 6.0)),
            Location::Inside { room: 2, kind: RoomKind::Hallway }
        );
    }

    #[test]
    fn point_outside_all_rooms() {
        let tracker = tracker();
        let location = tracker.locate(Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(location, Location::Outside);
        assert_eq!(location.name(), "Outside");
        assert!(!location.is_indoor());
    }

    #[test]
    fn overlap_resolves_to_first_in_list() {
        let tracker = tracker();
        assert_eq!(tracker.locate(Vec3::new(1.0, 0.0, 1.0)).kind(), Some(RoomKind::Kitchen));
    }

    #[test]
    fn update_is_throttled_and_fires_on_change_only() {
        let mut tracker = tracker();
        let mut bus = MessageBus::new();
        let kitchen = Vec3::new(1.0, 0.0, 1.0);
        let outside = Vec3::new(-5.0, 0.0, 0.0);

        assert!(tracker.update(Duration::ZERO, kitchen, &mut bus).is_some());
        assert_eq!(bus.count::<RoomChanged>(), 1);

        // Moved, but the throttle has not elapsed.
        assert!(tracker.update(Duration::from_millis(100), outside, &mut bus).is_none());
        assert_eq!(tracker.current().kind(), Some(RoomKind::Kitchen));

        assert_eq!(tracker.update(Duration::from_millis(300), outside, &mut bus), Some(Location::Outside));

        // Same room again: no notification.
        assert!(tracker.update(Duration::from_millis(600), outside, &mut bus).is_none());
        assert_eq!(bus.count::<RoomChanged>(), 2);
    }

    #[test]
    fn kind_deserializes_from_snake_case() {
        let kind: RoomKind = serde_json::from_str("\"living_room\"").unwrap();
        assert_eq!(kind, RoomKind::LivingRoom);
        assert_eq!(kind.to_string(), "Living Room");
    }
}
