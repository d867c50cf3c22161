//=========================================================================
// Item Lifecycle Manager
//=========================================================================
//
// Sole owner of the inventory and of every placed item instance.
//
// Architecture:
//   commands ──> ItemLifecycleManager
//                  ├─ select / cycle        → Equipped
//                  ├─ place / drop          → PlacedItems::spawn + visual
//                  ├─ pick up / detach      → back into Inventory
//                  ├─ primary use           → descriptor dispatch (Primary)
//                  ├─ secondary use         → placed toggle or Secondary
//                  └─ mount                 → camera bound to a tripod
//
// What an action does is looked up in the item's catalog descriptor;
// this module never branches on item ids. Every rejection is returned as
// an `InventoryError` and leaves inventory and world untouched.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::catalog::{ItemCatalog, ItemDef, ItemId, Primary, Secondary, SensorKind, UseKind};
use super::inventory::{HeldItem, Inventory};
use super::placed::{InstanceId, PlacedItem, PlacedItems};
use crate::core::config::InteractionConfig;
use crate::core::entity_index::{EntityIndex, Interactable};
use crate::core::error::InventoryError;
use crate::core::message_bus::MessageBus;
use crate::core::notify::{ItemEvent, ItemUsed};
use crate::core::player::Sanity;
use crate::core::surveillance::{CameraSource, FeedSource};
use crate::core::world::{NodeId, World};

//=== Context =============================================================

/// Collaborators an item operation may touch.
pub struct ItemContext<'a> {
    pub world: &'a mut dyn World,
    pub index: &'a mut EntityIndex,
    pub bus: &'a mut MessageBus,
}

/// Where the player is looking when an action fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub eye: Vec3,
    pub yaw: f32,
    pub focus: Option<Interactable>,
}

//=== ItemLifecycleManager ================================================

pub struct ItemLifecycleManager {
    catalog: Arc<ItemCatalog>,
    config: InteractionConfig,
    inventory: Inventory,
    placed: PlacedItems,
    feeds_dirty: bool,
}

impl ItemLifecycleManager {
    /// Creates an empty manager whose first placed instance gets
    /// `first_instance_id`.
    pub fn new(catalog: Arc<ItemCatalog>, config: &InteractionConfig, first_instance_id: u64) -> Self {
        Self {
            catalog,
            config: config.clone(),
            inventory: Inventory::new(),
            placed: PlacedItems::starting_at(first_instance_id),
            feeds_dirty: true,
        }
    }

    fn def(&self, item: &ItemId) -> Result<&ItemDef, InventoryError> {
        self.catalog
            .get(item)
            .ok_or_else(|| InventoryError::UnknownItem(item.clone()))
    }

    //--- Inventory --------------------------------------------------------

    /// Adds a fresh instance of `item` to the inventory.
    pub fn give(&mut self, item: &ItemId, bus: &mut MessageBus) -> Result<usize, InventoryError> {
        let def = self.def(item)?;
        let held = HeldItem::new(def.id.clone(), def.uses);
        let slotless = def.slotless;
        let before = self.equipped_item().cloned();

        let slot = self.inventory.insert(held, slotless)?;
        debug!("Gave {} into slot {}", item, slot);
        self.after_equip_change(before, bus);
        Ok(slot)
    }

    /// Points the selection at `slot`. Empty or out-of-range slots leave
    /// nothing equipped.
    pub fn select_slot(&mut self, slot: usize, bus: &mut MessageBus) {
        let before = self.equipped_item().cloned();
        self.inventory.select(slot);
        self.after_equip_change(before, bus);
    }

    /// Moves the selection by `step` slots, wrapping.
    pub fn cycle(&mut self, step: i32, bus: &mut MessageBus) {
        let before = self.equipped_item().cloned();
        self.inventory.cycle(step);
        self.after_equip_change(before, bus);
    }

    /// Publishes the equipped item if it differs from `before`.
    fn after_equip_change(&mut self, before: Option<ItemId>, bus: &mut MessageBus) {
        let after = self.equipped_item().cloned();
        if before != after {
            bus.publish(ItemEvent::Equipped {
                slot: self.inventory.equipped_index(),
                item: after,
            });
            self.feeds_dirty = true;
        }
    }

    //--- Placement --------------------------------------------------------

    /// World point in front of the player where a placed item lands.
    pub fn placement_point(&self, aim: &Aim, world: &dyn World) -> Vec3 {
        let forward = Vec3::new(aim.yaw.sin(), 0.0, aim.yaw.cos());
        let mut point = aim.eye + forward * self.config.place_distance;

        point.y = match world.probe_ground(point, self.config.place_probe) {
            Some(ground) => ground + self.config.place_offset,
            None => self.config.fallback_height,
        };
        point
    }

    /// Places the equipped item in the world. Only placeable items.
    pub fn place_equipped(&mut self, aim: &Aim, ctx: &mut ItemContext<'_>) -> Result<InstanceId, InventoryError> {
        let (_, held) = self.inventory.equipped().ok_or(InventoryError::SlotEmpty)?;
        if !self.def(&held.item)?.is_placeable() {
            return Err(InventoryError::Unsupported(held.item.clone()));
        }

        let (id, item, position) = self.anchor_equipped(aim, ctx)?;
        ctx.bus.publish(ItemEvent::Placed {
            instance: id,
            item,
            position,
            yaw: aim.yaw,
        });
        Ok(id)
    }

    /// Puts the equipped item down, whatever it is.
    pub fn drop_equipped(&mut self, aim: &Aim, ctx: &mut ItemContext<'_>) -> Result<InstanceId, InventoryError> {
        let (id, item, position) = self.anchor_equipped(aim, ctx)?;
        ctx.bus.publish(ItemEvent::Dropped {
            instance: id,
            item,
            position,
            yaw: aim.yaw,
        });
        Ok(id)
    }

    fn anchor_equipped(&mut self, aim: &Aim, ctx: &mut ItemContext<'_>) -> Result<(InstanceId, ItemId, Vec3), InventoryError> {
        let slot = self.inventory.equipped_index().ok_or(InventoryError::SlotEmpty)?;
        let position = self.placement_point(aim, &*ctx.world);
        let held = self.inventory.take(slot).ok_or(InventoryError::SlotEmpty)?;

        let item = held.item.clone();
        let id = self.spawn_instance(held, position, aim.yaw, ctx);
        publish_unequipped(ctx.bus);
        Ok((id, item, position))
    }

    /// Creates a world instance of a fresh item (layout items, loadout
    /// overflow).
    pub fn spawn_placed(
        &mut self,
        item: &ItemId,
        position: Vec3,
        yaw: f32,
        ctx: &mut ItemContext<'_>,
    ) -> Result<InstanceId, InventoryError> {
        let def = self.def(item)?;
        let held = HeldItem::new(def.id.clone(), def.uses);
        Ok(self.spawn_instance(held, position, yaw, ctx))
    }

    fn spawn_instance(&mut self, held: HeldItem, position: Vec3, yaw: f32, ctx: &mut ItemContext<'_>) -> InstanceId {
        let camera = self.is_camera(&held.item);
        let item = held.item.clone();
        let id = self.placed.spawn(held, position, yaw);

        ctx.world.place_visual(NodeId::Placed(id), &item, position, yaw);
        ctx.index.register_placed(id);
        if camera {
            self.feeds_dirty = true;
        }
        debug!("Spawned {} {} at {:?}", item, id, position);
        id
    }

    fn despawn_instance(&mut self, id: InstanceId, ctx: &mut ItemContext<'_>) -> Option<PlacedItem> {
        let instance = self.placed.remove(id)?;
        ctx.world.remove_visual(NodeId::Placed(id));
        ctx.index.unregister(Interactable::Pickup(id));
        if self.is_camera(&instance.item) {
            self.feeds_dirty = true;
        }
        Some(instance)
    }

    //--- Pick-up ----------------------------------------------------------

    /// Interact on a placed instance: an occupied tripod hands back its
    /// camera, anything else is picked up.
    pub fn interact(&mut self, id: InstanceId, ctx: &mut ItemContext<'_>) -> Result<usize, InventoryError> {
        let instance = self.placed.get(id).ok_or(InventoryError::UnknownInstance(id))?;
        if instance.carrying.is_some() {
            self.detach(id, ctx)
        } else {
            self.pick_up(id, ctx)
        }
    }

    /// Moves a placed instance into the first free slot.
    pub fn pick_up(&mut self, id: InstanceId, ctx: &mut ItemContext<'_>) -> Result<usize, InventoryError> {
        let instance = self.placed.get(id).ok_or(InventoryError::UnknownInstance(id))?;
        if let Some(camera) = instance.carrying {
            return Err(InventoryError::Occupied(camera));
        }
        let slotless = self.def(&instance.item)?.slotless;
        if !self.inventory.has_room(slotless) {
            return Err(InventoryError::Full);
        }

        let instance = self
            .despawn_instance(id, ctx)
            .ok_or(InventoryError::UnknownInstance(id))?;
        if let Some(tripod) = instance.mounted_on.and_then(|t| self.placed.get_mut(t)) {
            tripod.carrying = None;
        }

        let item = instance.item.clone();
        let slot = self.inventory.insert(instance.to_held(), slotless)?;
        ctx.bus.publish(ItemEvent::PickedUp { instance: id, item, slot });
        Ok(slot)
    }

    //--- Primary Use ------------------------------------------------------

    /// Primary action with the equipped item.
    pub fn use_primary(&mut self, aim: &Aim, sanity: &mut Sanity, ctx: &mut ItemContext<'_>) -> Result<(), InventoryError> {
        let catalog = Arc::clone(&self.catalog);
        let (slot, held) = self.inventory.equipped().ok_or(InventoryError::SlotEmpty)?;
        let def = catalog
            .get(&held.item)
            .ok_or_else(|| InventoryError::UnknownItem(held.item.clone()))?;

        match def.primary {
            Primary::None => Err(InventoryError::Unsupported(def.id.clone())),
            Primary::Place { .. } => {
                if def.mountable {
                    if let Some(tripod) = self.free_mount_point(aim.focus) {
                        return self.mount(tripod, ctx).map(|_| ());
                    }
                }
                self.place_equipped(aim, ctx).map(|_| ())
            }
            Primary::Use { action } => self.use_charge(slot, def, action, aim, sanity, ctx.bus),
        }
    }

    fn use_charge(
        &mut self,
        slot: usize,
        def: &ItemDef,
        action: UseKind,
        aim: &Aim,
        sanity: &mut Sanity,
        bus: &mut MessageBus,
    ) -> Result<(), InventoryError> {
        if def.requires_lighter && !self.inventory.has_lighter() {
            return Err(InventoryError::MissingLighter(def.id.clone()));
        }

        let held = self.inventory.slot_mut(slot).ok_or(InventoryError::SlotEmpty)?;
        let remaining = match held.uses {
            Some(0) => return Err(InventoryError::Exhausted(def.id.clone())),
            Some(n) => Some(n - 1),
            None => None,
        };
        held.uses = remaining;

        let used = match action {
            UseKind::CapturePhoto => ItemUsed::PhotoCaptured {
                remaining: remaining.unwrap_or(0),
            },
            UseKind::RestoreSanity { amount } => ItemUsed::SanityRestored {
                amount,
                sanity: sanity.restore(amount),
            },
            UseKind::IgniteSmudge => ItemUsed::SmudgeIgnited { position: aim.eye },
        };
        debug!("Used {}: {:?}", def.id, used);
        bus.publish(used);

        if remaining == Some(0) && action.consumes_item() {
            self.inventory.take(slot);
            bus.publish(ItemEvent::Consumed { item: def.id.clone() });
            publish_unequipped(bus);
        }
        Ok(())
    }

    //--- Secondary Use ----------------------------------------------------

    /// Secondary action: flips a focused toggleable placed device, or
    /// runs the equipped item's secondary behaviour.
    pub fn use_secondary(&mut self, focus: Option<Interactable>, bus: &mut MessageBus) -> Result<(), InventoryError> {
        if let Some(Interactable::Pickup(id)) = focus {
            let toggleable = match self.placed.get(id) {
                Some(instance) => self.def(&instance.item)?.is_toggleable_when_placed(),
                None => false,
            };
            if toggleable {
                return self.toggle_placed(id, bus).map(|_| ());
            }
        }

        let catalog = Arc::clone(&self.catalog);
        let (_, held) = self.inventory.equipped_mut().ok_or(InventoryError::SlotEmpty)?;
        let def = catalog
            .get(&held.item)
            .ok_or_else(|| InventoryError::UnknownItem(held.item.clone()))?;

        match def.secondary {
            Secondary::None => Err(InventoryError::Unsupported(def.id.clone())),
            Secondary::TogglePower => {
                held.powered = !held.powered;
                bus.publish(ItemEvent::HeldPowerToggled {
                    item: def.id.clone(),
                    on: held.powered,
                });
                self.feeds_dirty |= def.camera_feed;
                Ok(())
            }
            Secondary::ToggleAltMode => {
                held.alt_mode = !held.alt_mode;
                bus.publish(ItemEvent::AltModeToggled {
                    item: def.id.clone(),
                    on: held.alt_mode,
                });
                self.feeds_dirty |= def.camera_feed;
                Ok(())
            }
        }
    }

    /// Power switch of the equipped device.
    pub fn toggle_equipped_power(&mut self, bus: &mut MessageBus) -> Result<bool, InventoryError> {
        let catalog = Arc::clone(&self.catalog);
        let (_, held) = self.inventory.equipped_mut().ok_or(InventoryError::SlotEmpty)?;
        let def = catalog
            .get(&held.item)
            .ok_or_else(|| InventoryError::UnknownItem(held.item.clone()))?;
        if !def.powered {
            return Err(InventoryError::Unsupported(def.id.clone()));
        }

        held.powered = !held.powered;
        bus.publish(ItemEvent::HeldPowerToggled {
            item: def.id.clone(),
            on: held.powered,
        });
        self.feeds_dirty |= def.camera_feed;
        Ok(held.powered)
    }

    /// Flips the on/off flag of a placed device.
    pub fn toggle_placed(&mut self, id: InstanceId, bus: &mut MessageBus) -> Result<bool, InventoryError> {
        let catalog = Arc::clone(&self.catalog);
        let instance = self.placed.get_mut(id).ok_or(InventoryError::UnknownInstance(id))?;
        let def = catalog
            .get(&instance.item)
            .ok_or_else(|| InventoryError::UnknownItem(instance.item.clone()))?;
        if !def.is_toggleable_when_placed() {
            return Err(InventoryError::Unsupported(def.id.clone()));
        }

        instance.on = !instance.on;
        bus.publish(ItemEvent::PlacedPowerToggled {
            instance: id,
            item: def.id.clone(),
            on: instance.on,
        });
        self.feeds_dirty |= def.camera_feed;
        Ok(instance.on)
    }

    //--- Mounting ---------------------------------------------------------

    fn free_mount_point(&self, focus: Option<Interactable>) -> Option<InstanceId> {
        let Some(Interactable::Pickup(id)) = focus else {
            return None;
        };
        let instance = self.placed.get(id)?;
        let def = self.catalog.get(&instance.item)?;
        (def.mount_point && instance.carrying.is_none()).then_some(id)
    }

    /// Mounts the equipped camera on a placed tripod.
    pub fn mount(&mut self, tripod: InstanceId, ctx: &mut ItemContext<'_>) -> Result<InstanceId, InventoryError> {
        let (slot, held) = self.inventory.equipped().ok_or(InventoryError::SlotEmpty)?;
        if !self.def(&held.item)?.mountable {
            return Err(InventoryError::Unsupported(held.item.clone()));
        }

        let base = self.placed.get(tripod).ok_or(InventoryError::UnknownInstance(tripod))?;
        if !self.def(&base.item)?.mount_point {
            return Err(InventoryError::Unsupported(base.item.clone()));
        }
        if let Some(camera) = base.carrying {
            return Err(InventoryError::Occupied(camera));
        }
        let position = base.position + Vec3::Y * self.config.tripod_mount_height;
        let yaw = base.yaw;

        let held = self.inventory.take(slot).ok_or(InventoryError::SlotEmpty)?;
        let camera = self.spawn_instance(held, position, yaw, ctx);
        if let Some(instance) = self.placed.get_mut(camera) {
            instance.mounted_on = Some(tripod);
        }
        if let Some(base) = self.placed.get_mut(tripod) {
            base.carrying = Some(camera);
        }

        debug!("Mounted {} on tripod {}", camera, tripod);
        ctx.bus.publish(ItemEvent::Mounted { camera, tripod });
        publish_unequipped(ctx.bus);
        Ok(camera)
    }

    /// Returns the camera on `tripod` to the inventory.
    pub fn detach(&mut self, tripod: InstanceId, ctx: &mut ItemContext<'_>) -> Result<usize, InventoryError> {
        let base = self.placed.get(tripod).ok_or(InventoryError::UnknownInstance(tripod))?;
        let camera = base.carrying.ok_or(InventoryError::NotMounted(tripod))?;
        let instance = self.placed.get(camera).ok_or(InventoryError::UnknownInstance(camera))?;
        let slotless = self.def(&instance.item)?.slotless;
        if !self.inventory.has_room(slotless) {
            return Err(InventoryError::Full);
        }

        let instance = self
            .despawn_instance(camera, ctx)
            .ok_or(InventoryError::UnknownInstance(camera))?;
        if let Some(base) = self.placed.get_mut(tripod) {
            base.carrying = None;
        }

        let slot = self.inventory.insert(instance.to_held(), slotless)?;
        debug!("Detached {} from tripod {}", camera, tripod);
        ctx.bus.publish(ItemEvent::Detached { camera, tripod, slot });
        Ok(slot)
    }

    //--- Session ----------------------------------------------------------

    /// Removes every placed visual and empties all collections. Instance
    /// ids keep counting.
    pub fn teardown(&mut self, world: &mut dyn World, index: &mut EntityIndex) {
        for id in self.placed.ids() {
            world.remove_visual(NodeId::Placed(id));
            index.unregister(Interactable::Pickup(id));
        }
        self.placed.clear();
        self.inventory.clear();
        self.feeds_dirty = true;
    }

    //--- Surveillance -----------------------------------------------------

    fn is_camera(&self, item: &ItemId) -> bool {
        self.catalog.get(item).is_some_and(|def| def.camera_feed)
    }

    /// Feed sources in routing priority: held camera, then placed
    /// cameras by instance id.
    pub fn camera_sources(&self) -> Vec<CameraSource> {
        let held = self
            .inventory
            .equipped()
            .filter(|(_, held)| self.is_camera(&held.item))
            .map(|(_, held)| CameraSource {
                source: FeedSource::HeldCamera,
                on: held.powered,
                infrared: held.alt_mode,
                position: None,
                yaw: 0.0,
            });

        let placed = self
            .placed
            .iter()
            .filter(|instance| self.is_camera(&instance.item))
            .map(|instance| CameraSource {
                source: FeedSource::Placed(instance.id),
                on: instance.on,
                infrared: instance.alt_mode,
                position: Some(instance.position),
                yaw: instance.yaw,
            });

        held.into_iter().chain(placed).collect()
    }

    /// Returns and clears the "camera inputs changed" flag.
    pub fn take_feeds_dirty(&mut self) -> bool {
        std::mem::take(&mut self.feeds_dirty)
    }

    //--- Query Methods ----------------------------------------------------

    pub fn equipped_item(&self) -> Option<&ItemId> {
        self.inventory.equipped().map(|(_, held)| &held.item)
    }

    /// Sensor of the equipped item, if it has one and is switched on.
    pub fn active_sensor(&self) -> Option<SensorKind> {
        let (_, held) = self.inventory.equipped()?;
        let def = self.catalog.get(&held.item)?;
        def.sensor.filter(|_| held.powered)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn placed(&self) -> &PlacedItems {
        &self.placed
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// First instance id the next session should use.
    pub fn next_instance_id(&self) -> u64 {
        self.placed.next_id()
    }
}

/// The equipped item left the hand (placed, mounted or used up).
fn publish_unequipped(bus: &mut MessageBus) {
    bus.publish(ItemEvent::Equipped { slot: None, item: None });
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::HeadlessWorld;

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        items: ItemLifecycleManager,
        world: HeadlessWorld,
        index: EntityIndex,
        bus: MessageBus,
        sanity: Sanity,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                items: ItemLifecycleManager::new(
                    Arc::new(ItemCatalog::builtin()),
                    &InteractionConfig::default(),
                    1,
                ),
                world: HeadlessWorld::new(),
                index: EntityIndex::new(),
                bus: MessageBus::new(),
                sanity: Sanity::default(),
            }
        }

        fn with(items: &[&str]) -> Self {
            let mut fixture = Self::new();
            for id in items {
                fixture.items.give(&ItemId::from(*id), &mut fixture.bus).unwrap();
            }
            fixture
        }

        /// Manager plus a context over the remaining fields.
        fn split(&mut self) -> (&mut ItemLifecycleManager, ItemContext<'_>) {
            (
                &mut self.items,
                ItemContext {
                    world: &mut self.world,
                    index: &mut self.index,
                    bus: &mut self.bus,
                },
            )
        }

        fn spawn(&mut self, item: &str, position: Vec3) -> InstanceId {
            let (items, mut ctx) = self.split();
            items.spawn_placed(&ItemId::from(item), position, 0.0, &mut ctx).unwrap()
        }

        fn pick_up(&mut self, placed: InstanceId) -> Result<usize, InventoryError> {
            let (items, mut ctx) = self.split();
            items.pick_up(placed, &mut ctx)
        }

        fn equip(&mut self, slot: usize) {
            self.items.select_slot(slot, &mut self.bus);
        }

        fn place(&mut self, focus: Option<Interactable>) -> Result<(), InventoryError> {
            let aim = aim(focus);
            let mut ctx = ItemContext {
                world: &mut self.world,
                index: &mut self.index,
                bus: &mut self.bus,
            };
            self.items.use_primary(&aim, &mut self.sanity, &mut ctx)
        }
    }

    fn aim(focus: Option<Interactable>) -> Aim {
        Aim {
            eye: Vec3::new(0.0, 1.7, 0.0),
            yaw: 0.0,
            focus,
        }
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    //--- Equip ------------------------------------------------------------

    #[test]
    fn equipping_slot_matches_its_contents() {
        let mut f = Fixture::with(&["emf_reader", "salt"]);

        f.equip(1);
        assert_eq!(f.items.equipped_item(), Some(&id("salt")));

        f.equip(2);
        assert_eq!(f.items.equipped_item(), None);

        f.equip(9);
        assert_eq!(f.items.equipped_item(), None);
    }

    #[test]
    fn wheel_cycle_switches_without_stacking() {
        let mut f = Fixture::with(&["emf_reader", "salt", "crucifix"]);
        f.equip(0);
        f.items.cycle(1, &mut f.bus);
        assert_eq!(f.items.equipped_item(), Some(&id("salt")));
        assert_eq!(f.items.inventory().general_count(), 3);
    }

    //--- Placement --------------------------------------------------------

    #[test]
    fn placing_creates_one_instance_on_the_floor() {
        let mut f = Fixture::with(&["salt"]);
        f.equip(0);

        f.place(None).unwrap();

        assert_eq!(f.items.placed().len(), 1);
        let instance = f.items.placed().iter().next().unwrap();
        assert_eq!(instance.position, Vec3::new(0.0, 0.02, 1.2));
        assert_eq!(instance.yaw, 0.0);
        assert!(f.items.inventory().slot(0).is_none());
        assert_eq!(f.items.equipped_item(), None);
        assert!(f.index.contains(NodeId::Placed(instance.id)));
    }

    #[test]
    fn placement_falls_back_without_ground() {
        let mut f = Fixture::with(&["lantern"]);
        f.world = HeadlessWorld::new().with_floor_extent(0.5);
        f.equip(0);

        f.place(None).unwrap();
        assert_eq!(f.items.placed().iter().next().unwrap().position.y, 0.0);
    }

    #[test]
    fn pick_up_removes_instance_for_good() {
        let mut f = Fixture::with(&["crucifix"]);
        f.equip(0);
        f.place(None).unwrap();
        let placed = f.items.placed().ids()[0];

        assert_eq!(f.pick_up(placed), Ok(0));
        assert!(f.items.placed().get(placed).is_none());
        assert!(!f.index.contains(NodeId::Placed(placed)));
        assert_eq!(f.pick_up(placed), Err(InventoryError::UnknownInstance(placed)));

        // Placing again never reuses the old id
        f.equip(0);
        f.place(None).unwrap();
        assert_ne!(f.items.placed().ids()[0], placed);
    }

    #[test]
    fn pick_up_into_full_inventory_is_rejected() {
        let mut f = Fixture::new();
        let salt = f.spawn("salt", Vec3::ZERO);
        for item in ["emf_reader", "flashlight", "thermometer"] {
            f.items.give(&id(item), &mut f.bus).unwrap();
        }

        assert_eq!(f.pick_up(salt), Err(InventoryError::Full));
        assert!(f.items.placed().contains(salt));
        assert_eq!(f.items.inventory().general_count(), 3);
    }

    #[test]
    fn lighter_pick_up_ignores_general_capacity() {
        let mut f = Fixture::with(&["emf_reader", "flashlight", "thermometer"]);
        let lighter = f.spawn("lighter", Vec3::ZERO);

        assert_eq!(f.pick_up(lighter), Ok(3));
    }

    #[test]
    fn drop_works_for_non_placeables() {
        let mut f = Fixture::with(&["emf_reader"]);
        f.equip(0);

        let (items, mut ctx) = f.split();
        assert_eq!(
            items.place_equipped(&aim(None), &mut ctx),
            Err(InventoryError::Unsupported(id("emf_reader")))
        );
        items.drop_equipped(&aim(None), &mut ctx).unwrap();
        assert_eq!(f.items.placed().len(), 1);
    }

    //--- Use --------------------------------------------------------------

    #[test]
    fn photo_camera_counts_down_and_stays() {
        let mut f = Fixture::with(&["photo_camera"]);
        f.equip(0);

        for _ in 0..5 {
            f.place(None).unwrap();
        }
        assert_eq!(f.place(None), Err(InventoryError::Exhausted(id("photo_camera"))));
        assert_eq!(f.items.equipped_item(), Some(&id("photo_camera")));
        assert_eq!(f.bus.count::<ItemUsed>(), 5);
    }

    #[test]
    fn sanity_pills_restore_and_are_consumed() {
        let mut f = Fixture::with(&["sanity_pills"]);
        f.sanity.drain(70.0);
        f.equip(0);

        f.place(None).unwrap();

        assert_eq!(f.sanity.value(), 70.0);
        assert!(f.items.inventory().slot(0).is_none());
        assert!(f.bus.read::<ItemEvent>().contains(&ItemEvent::Consumed { item: id("sanity_pills") }));
    }

    #[test]
    fn smudge_needs_lighter() {
        let mut f = Fixture::with(&["smudge_sticks"]);
        f.equip(0);
        assert_eq!(f.place(None), Err(InventoryError::MissingLighter(id("smudge_sticks"))));

        f.items.give(&id("lighter"), &mut f.bus).unwrap();
        f.equip(0);
        f.place(None).unwrap();
        assert!(matches!(f.bus.latest::<ItemUsed>(), Some(ItemUsed::SmudgeIgnited { .. })));
    }

    #[test]
    fn secondary_toggles_equipped_device() {
        let mut f = Fixture::with(&["flashlight"]);
        f.equip(0);

        f.items.use_secondary(None, &mut f.bus).unwrap();
        assert!(f.items.inventory().slot(0).unwrap().powered);

        f.items.use_secondary(None, &mut f.bus).unwrap();
        assert!(!f.items.inventory().slot(0).unwrap().powered);
    }

    #[test]
    fn secondary_on_placed_device_ignores_equipped() {
        let mut f = Fixture::with(&["emf_reader"]);
        let lantern = f.spawn("lantern", Vec3::ZERO);
        f.equip(0);

        f.items.use_secondary(Some(Interactable::Pickup(lantern)), &mut f.bus).unwrap();

        assert!(f.items.placed().get(lantern).unwrap().on);
        assert!(!f.items.inventory().slot(0).unwrap().powered);
    }

    #[test]
    fn sensor_reports_only_when_powered() {
        let mut f = Fixture::with(&["emf_reader"]);
        f.equip(0);
        assert_eq!(f.items.active_sensor(), None);

        f.items.toggle_equipped_power(&mut f.bus).unwrap();
        assert_eq!(f.items.active_sensor(), Some(SensorKind::Emf));
    }

    //--- Mounting ---------------------------------------------------------

    #[test]
    fn camera_mounts_on_focused_tripod_and_detaches() {
        let mut f = Fixture::with(&["video_camera"]);
        let tripod = {
            let (items, mut ctx) = f.split();
            items.spawn_placed(&id("tripod"), Vec3::new(0.0, 0.0, 1.0), 0.5, &mut ctx).unwrap()
        };
        f.equip(0);

        f.place(Some(Interactable::Pickup(tripod))).unwrap();

        let camera = f.items.placed().get(tripod).unwrap().carrying.unwrap();
        let mounted = f.items.placed().get(camera).unwrap();
        assert_eq!(mounted.mounted_on, Some(tripod));
        assert_eq!(mounted.position, Vec3::new(0.0, 1.3, 1.0));
        assert_eq!(mounted.yaw, 0.5);

        // Tripod cannot be picked up while occupied
        assert_eq!(f.pick_up(tripod), Err(InventoryError::Occupied(camera)));

        // Interacting with the tripod hands the camera back
        let (items, mut ctx) = f.split();
        assert_eq!(items.interact(tripod, &mut ctx), Ok(0));
        assert!(f.items.placed().get(tripod).unwrap().carrying.is_none());
        assert!(!f.items.placed().contains(camera));
    }

    #[test]
    fn placed_cameras_feed_in_id_order() {
        let mut f = Fixture::new();
        let a = f.spawn("video_camera", Vec3::ZERO);
        let b = f.spawn("video_camera", Vec3::X);
        f.spawn("salt", Vec3::Z);

        let sources: Vec<_> = f.items.camera_sources().iter().map(|s| s.source).collect();
        assert_eq!(sources, vec![FeedSource::Placed(a), FeedSource::Placed(b)]);
        assert!(f.items.take_feeds_dirty());
        assert!(!f.items.take_feeds_dirty());
    }

    #[test]
    fn teardown_clears_everything_but_the_counter() {
        let mut f = Fixture::with(&["salt"]);
        let placed = f.spawn("lantern", Vec3::ZERO);

        f.items.teardown(&mut f.world, &mut f.index);

        assert!(f.items.placed().is_empty());
        assert_eq!(f.items.inventory().iter().count(), 0);
        assert!(f.index.is_empty());
        assert_eq!(f.world.visual_count(), 0);
        assert!(f.items.next_instance_id() > placed.value());
    }
}
