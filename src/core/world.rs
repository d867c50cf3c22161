//=========================================================================
// World Collaborators
//=========================================================================
//
// Contracts for the services the core consumes but does not own: the
// scene/physics engine, the asset loader and the house layout it returns.
//
// Architecture:
//   Game ──tick(dt, &mut dyn World)──> pick_forward / probe_ground /
//                                      move_and_collide / place_visual
//   Game ──AssetLoader::request(ticket)──> host
//   host ──HostEvent::AssetsReady{ticket, HouseLayout}──> Game
//
// `HeadlessWorld` is a self-contained implementation for hosts without a
// renderer and for tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use glam::Vec3;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::doors::DoorId;
use super::items::{InstanceId, ItemId};
use super::platform_bridge::{LoadTicket, SessionRequest};
use super::rooms::Room;

//=== NodeId ==============================================================

/// A pickable visual node.
///
/// Host geometry is addressed by the host's own ids. Placed items are
/// addressed by instance id; the renderer tags every sub-mesh of a placed
/// item's visual with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Scene(u64),
    Placed(InstanceId),
}

//=== World ===============================================================

/// Scene, physics and transform services used during a tick.
pub trait World {
    /// Casts a ray and returns the nearest node accepted by `filter`
    /// within `max_distance`.
    fn pick_forward(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &dyn Fn(NodeId) -> bool,
    ) -> Option<NodeId>;

    /// Height of the first walkable surface at most `max_distance` below
    /// `origin`.
    fn probe_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32>;

    /// Applies a collision-aware displacement to a collider whose feet
    /// are at `position` and returns the resolved position.
    fn move_and_collide(&mut self, position: Vec3, displacement: Vec3, collider_height: f32) -> Vec3;

    /// Creates or moves the visual of a placed item.
    fn place_visual(&mut self, _node: NodeId, _item: &ItemId, _position: Vec3, _yaw: f32) {}

    /// Destroys the visual of a placed item.
    fn remove_visual(&mut self, _node: NodeId) {}
}

//=== AssetLoader =========================================================

/// Starts asynchronous asset loads.
///
/// Completion is reported later through `HostEvent::AssetsReady` or
/// `HostEvent::AssetsFailed` carrying the same ticket.
pub trait AssetLoader: Send {
    fn request(&mut self, ticket: LoadTicket, request: &SessionRequest);
}

//=== HouseLayout =========================================================

/// A door pivot and the visual nodes that belong to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoorSpec {
    pub id: DoorId,
    pub nodes: Vec<u64>,
}

/// An item already lying in the house when the session starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitialItem {
    pub item: ItemId,
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
}

/// Everything the layout generator and the asset loader produce for one
/// session. Read-only once the session starts.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HouseLayout {
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub doors: Vec<DoorSpec>,
    /// Visual nodes of the surveillance terminal.
    #[serde(default)]
    pub terminals: Vec<u64>,
    pub spawn: Vec3,
    #[serde(default)]
    pub spawn_yaw: f32,
    /// Where the entity's rendered position starts.
    #[serde(default)]
    pub ghost_origin: Vec3,
    #[serde(default)]
    pub items: Vec<InitialItem>,
}

impl HouseLayout {
    /// A layout without rooms has no playable geometry.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

//=== HeadlessWorld =======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sphere {
    center: Vec3,
    radius: f32,
}

/// Flat-floor world without walls.
///
/// The floor lies at y = 0 and spans `floor_extent` around the origin on
/// both horizontal axes (unbounded by default). Pickable nodes are
/// spheres; placed items get a sphere automatically.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWorld {
    floor_extent: Option<f32>,
    pickables: HashMap<NodeId, Sphere>,
    visuals: HashMap<NodeId, (ItemId, Vec3, f32)>,
}

impl HeadlessWorld {
    const PLACED_RADIUS: f32 = 0.25;

    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the floor to |x|, |z| <= `half_size`.
    pub fn with_floor_extent(mut self, half_size: f32) -> Self {
        self.floor_extent = Some(half_size);
        self
    }

    /// Adds a pickable sphere for a host node.
    pub fn add_pickable(&mut self, node: NodeId, center: Vec3, radius: f32) {
        self.pickables.insert(node, Sphere { center, radius });
    }

    pub fn remove_pickable(&mut self, node: NodeId) {
        self.pickables.remove(&node);
    }

    /// Visual state of a placed item, as last written by the core.
    pub fn visual(&self, node: NodeId) -> Option<(&ItemId, Vec3, f32)> {
        self.visuals.get(&node).map(|(item, pos, yaw)| (item, *pos, *yaw))
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    fn floor_under(&self, x: f32, z: f32) -> bool {
        match self.floor_extent {
            Some(half) => x.abs() <= half && z.abs() <= half,
            None => true,
        }
    }

    /// Distance along a normalized ray to a sphere, if hit.
    fn ray_sphere(origin: Vec3, direction: Vec3, sphere: &Sphere) -> Option<f32> {
        let to_center = sphere.center - origin;
        let along = to_center.dot(direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = sphere.radius * sphere.radius;
        if closest_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - closest_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}

impl World for HeadlessWorld {
    fn pick_forward(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &dyn Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        let direction = direction.try_normalize()?;

        self.pickables
            .iter()
            .filter(|(node, _)| filter(**node))
            .filter_map(|(node, sphere)| Self::ray_sphere(origin, direction, sphere).map(|d| (*node, d)))
            .filter(|&(_, distance)| distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(node, _)| node)
    }

    fn probe_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        let reachable = origin.y >= 0.0 && origin.y <= max_distance;
        (reachable && self.floor_under(origin.x, origin.z)).then_some(0.0)
    }

    fn move_and_collide(&mut self, position: Vec3, displacement: Vec3, _collider_height: f32) -> Vec3 {
        let mut next = position + displacement;
        if position.y >= 0.0 && next.y < 0.0 && self.floor_under(next.x, next.z) {
            next.y = 0.0;
        }
        next
    }

    fn place_visual(&mut self, node: NodeId, item: &ItemId, position: Vec3, yaw: f32) {
        self.visuals.insert(node, (item.clone(), position, yaw));
        self.pickables.insert(
            node,
            Sphere {
                center: position,
                radius: Self::PLACED_RADIUS,
            },
        );
    }

    fn remove_visual(&mut self, node: NodeId) {
        self.visuals.remove(&node);
        self.pickables.remove(&node);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
