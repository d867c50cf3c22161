//=========================================================================
// Placed Items
//=========================================================================
//
// World-anchored item instances.
//
// Instance ids are assigned monotonically and never reused, including
// across sessions: the allocator's next id is handed from one session to
// the next, so a late reference to an old instance can never alias a new
// one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::catalog::ItemId;
use super::inventory::HeldItem;

//=== InstanceId ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl InstanceId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== PlacedItem ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub id: InstanceId,
    pub item: ItemId,
    pub position: Vec3,
    /// Rotation about the vertical axis only.
    pub yaw: f32,
    /// On/off flag of toggleable devices.
    pub on: bool,
    pub alt_mode: bool,
    pub uses: Option<u32>,
    /// Tripod this camera sits on.
    pub mounted_on: Option<InstanceId>,
    /// Camera sitting on this tripod.
    pub carrying: Option<InstanceId>,
}

impl PlacedItem {
    /// State to carry back into the inventory on pick-up.
    pub fn to_held(&self) -> HeldItem {
        HeldItem {
            item: self.item.clone(),
            uses: self.uses,
            powered: self.on,
            alt_mode: self.alt_mode,
        }
    }
}

//=== PlacedItems =========================================================

/// Placed instances keyed (and iterated) by instance id.
#[derive(Debug, Clone)]
pub struct PlacedItems {
    items: BTreeMap<InstanceId, PlacedItem>,
    next_id: u64,
}

impl PlacedItems {
    /// Creates an empty set whose first instance id is `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: first_id.max(1),
        }
    }

    /// Creates a new instance from held state.
    pub fn spawn(&mut self, held: HeldItem, position: Vec3, yaw: f32) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        self.items.insert(
            id,
            PlacedItem {
                id,
                item: held.item,
                position,
                yaw,
                on: held.powered,
                alt_mode: held.alt_mode,
                uses: held.uses,
                mounted_on: None,
                carrying: None,
            },
        );
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&PlacedItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut PlacedItem> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.items.contains_key(&id)
    }

    /// Removes an instance for good.
    pub fn remove(&mut self, id: InstanceId) -> Option<PlacedItem> {
        self.items.remove(&id)
    }

    /// Instances in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedItem> {
        self.items.values()
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.items.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id the next spawn will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Removes every instance; ids keep counting up.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Default for PlacedItems {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn held(id: &str) -> HeldItem {
        HeldItem::new(ItemId::from(id), None)
    }

    #[test]
    fn spawn_assigns_fresh_monotonic_ids() {
        let mut placed = PlacedItems::default();
        let a = placed.spawn(held("salt"), Vec3::ZERO, 0.0);
        let b = placed.spawn(held("salt"), Vec3::ZERO, 0.0);

        assert!(b > a);
        assert_eq!(placed.len(), 2);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut placed = PlacedItems::default();
        let a = placed.spawn(held("crucifix"), Vec3::ZERO, 0.0);
        placed.remove(a);
        placed.clear();

        let b = placed.spawn(held("crucifix"), Vec3::ZERO, 0.0);
        assert_ne!(a, b);
        assert!(placed.get(a).is_none());
    }

    #[test]
    fn held_state_round_trips_through_placement() {
        let mut placed = PlacedItems::starting_at(40);
        let mut camera = HeldItem::new(ItemId::from("video_camera"), None);
        camera.powered = true;
        camera.alt_mode = true;

        let id = placed.spawn(camera.clone(), Vec3::new(1.0, 0.0, 2.0), 1.0);
        assert_eq!(id, InstanceId(40));

        let instance = placed.get(id).unwrap();
        assert!(instance.on);
        assert_eq!(instance.to_held(), camera);
    }

    #[test]
    fn iteration_is_ordered_by_id() {
        let mut placed = PlacedItems::default();
        for id in ["lantern", "tripod", "salt"] {
            placed.spawn(held(id), Vec3::ZERO, 0.0);
        }
        let ids: Vec<_> = placed.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
