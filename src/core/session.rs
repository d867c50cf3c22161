//=========================================================================
// Session
//=========================================================================
//
// Everything that lives for exactly one Loading → teardown cycle.
//
// Architecture:
//   Game
//    └─ Option<Session>
//         ├─ PlayerController      ├─ RoomOccupancyTracker
//         ├─ ItemLifecycleManager  ├─ InteractionResolver
//         ├─ DoorStateMachine      ├─ SurveillanceRouter
//         ├─ GhostAgent            └─ EntityIndex
//
// A session is built from a finished `HouseLayout` when `Playing` is
// entered and dropped on teardown. Because all per-session collections
// hang off this one value, nothing from a previous session can survive
// into the next.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::Vec3;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::clock::secs;
use super::config::GameConfig;
use super::doors::DoorStateMachine;
use super::entity_index::{EntityIndex, Interactable};
use super::ghost::GhostAgent;
use super::interaction::InteractionResolver;
use super::items::{Aim, ItemCatalog, ItemContext, ItemLifecycleManager};
use super::message_bus::MessageBus;
use super::platform_bridge::{LoadTicket, SessionRequest};
use super::player::PlayerController;
use super::rooms::RoomOccupancyTracker;
use super::surveillance::SurveillanceRouter;
use super::world::{HouseLayout, NodeId, World};

//=== Session =============================================================

pub struct Session {
    ticket: LoadTicket,
    request: SessionRequest,

    pub(crate) player: PlayerController,
    pub(crate) items: ItemLifecycleManager,
    pub(crate) doors: DoorStateMachine,
    pub(crate) rooms: RoomOccupancyTracker,
    pub(crate) ghost: GhostAgent,
    pub(crate) interaction: InteractionResolver,
    pub(crate) surveillance: SurveillanceRouter,
    pub(crate) index: EntityIndex,
    pub(crate) monitor_open: bool,
}

impl Session {
    /// Loadout items that do not fit are set down around the spawn point
    /// this far apart.
    const OVERFLOW_SPACING: f32 = 0.5;

    /// Builds a session from a finished layout and spawns the player.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn start(
        ticket: LoadTicket,
        request: SessionRequest,
        layout: HouseLayout,
        config: &GameConfig,
        catalog: Arc<ItemCatalog>,
        first_instance_id: u64,
        world: &mut dyn World,
        bus: &mut MessageBus,
    ) -> Self {
        let mut index = EntityIndex::new();

        let mut doors = DoorStateMachine::new(&config.doors);
        for door in &layout.doors {
            doors.register(door.id);
            index.register(Interactable::Door(door.id), door.nodes.iter().map(|&n| NodeId::Scene(n)));
        }
        index.register(Interactable::Terminal, layout.terminals.iter().map(|&n| NodeId::Scene(n)));

        let mut session = Self {
            ticket,
            player: PlayerController::new(&config.player, layout.spawn, layout.spawn_yaw),
            items: ItemLifecycleManager::new(catalog, &config.interaction, first_instance_id),
            doors,
            rooms: RoomOccupancyTracker::new(
                layout.rooms,
                secs(config.rooms.interval_secs),
            ),
            ghost: GhostAgent::new(&config.ghost, layout.ghost_origin),
            interaction: InteractionResolver::new(&config.interaction),
            surveillance: SurveillanceRouter::new(&config.surveillance),
            index,
            monitor_open: false,
            request,
        };

        //--- World items --------------------------------------------------
        for initial in &layout.items {
            let mut ctx = ItemContext {
                world: &mut *world,
                index: &mut session.index,
                bus: &mut *bus,
            };
            if let Err(e) = session.items.spawn_placed(&initial.item, initial.position, initial.yaw, &mut ctx) {
                warn!("Layout item {} skipped: {}", initial.item, e);
            }
        }

        //--- Loadout ------------------------------------------------------
        let loadout = session.request.loadout.clone();
        let mut overflow = 0;
        for item in &loadout {
            if session.items.give(item, bus).is_ok() {
                continue;
            }
            overflow += 1;
            let position = layout.spawn + session.player.right() * Self::OVERFLOW_SPACING * overflow as f32;
            let mut ctx = ItemContext {
                world: &mut *world,
                index: &mut session.index,
                bus: &mut *bus,
            };
            match session.items.spawn_placed(item, position, layout.spawn_yaw, &mut ctx) {
                Ok(id) => debug!("Loadout {} placed next to spawn as {}", item, id),
                Err(e) => warn!("Loadout item {} skipped: {}", item, e),
            }
        }

        info!(
            "Session {} started: {} doors, {} rooms, {} placed items",
            ticket,
            session.doors.len(),
            session.rooms.rooms().len(),
            session.items.placed().len()
        );
        session
    }

    /// Removes everything this session put into the world.
    pub(crate) fn teardown(&mut self, world: &mut dyn World) {
        self.items.teardown(world, &mut self.index);
        self.doors.clear();
        self.index.clear();
        info!("Session {} torn down", self.ticket);
    }

    /// Player pose and current focus for item actions.
    pub(crate) fn aim(&self) -> Aim {
        Aim {
            eye: self.player.eye(),
            yaw: self.player.yaw(),
            focus: self.interaction.focus(),
        }
    }

    /// Item context over this session's index.
    pub(crate) fn split_items<'a>(
        &'a mut self,
        world: &'a mut dyn World,
        bus: &'a mut MessageBus,
    ) -> (&'a mut ItemLifecycleManager, ItemContext<'a>) {
        (
            &mut self.items,
            ItemContext {
                world,
                index: &mut self.index,
                bus,
            },
        )
    }

    //--- Query Methods ----------------------------------------------------

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn request(&self) -> &SessionRequest {
        &self.request
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn items(&self) -> &ItemLifecycleManager {
        &self.items
    }

    pub fn doors(&self) -> &DoorStateMachine {
        &self.doors
    }

    pub fn rooms(&self) -> &RoomOccupancyTracker {
        &self.rooms
    }

    pub fn ghost(&self) -> &GhostAgent {
        &self.ghost
    }

    pub fn interaction(&self) -> &InteractionResolver {
        &self.interaction
    }

    pub fn surveillance(&self) -> &SurveillanceRouter {
        &self.surveillance
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn spawn(&self) -> Vec3 {
        self.player.spawn()
    }

    pub fn is_monitor_open(&self) -> bool {
        self.monitor_open
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::doors::DoorId;
    use crate::core::items::ItemId;
    use crate::core::rooms::{Room, RoomKind};
    use crate::core::world::{DoorSpec, HeadlessWorld, InitialItem};

    fn layout() -> HouseLayout {
        HouseLayout {
            rooms: vec![Room::new(1, RoomKind::Kitchen, -5.0, -5.0, 10.0, 10.0)],
            doors: vec![DoorSpec {
                id: DoorId(7),
                nodes: vec![70, 71],
            }],
            terminals: vec![90],
            spawn: Vec3::new(1.0, 0.0, 2.0),
            items: vec![InitialItem {
                item: ItemId::from("crucifix"),
                position: Vec3::new(3.0, 0.0, 3.0),
                yaw: 0.0,
            }],
            ..Default::default()
        }
    }

    fn start(request: SessionRequest, world: &mut HeadlessWorld, bus: &mut MessageBus) -> Session {
        Session::start(
            LoadTicket(1),
            request,
            layout(),
            &GameConfig::default(),
            Arc::new(ItemCatalog::builtin()),
            10,
            world,
            bus,
        )
    }

    #[test]
    fn start_registers_layout_entities() {
        let mut world = HeadlessWorld::new();
        let mut bus = MessageBus::new();
        let session = start(SessionRequest::new("farmhouse", "wraith"), &mut world, &mut bus);

        assert_eq!(session.player().position(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(session.index().resolve(NodeId::Scene(71)), Some(Interactable::Door(DoorId(7))));
        assert_eq!(session.index().resolve(NodeId::Scene(90)), Some(Interactable::Terminal));
        assert_eq!(session.doors().is_open(DoorId(7)), Some(false));
        assert_eq!(session.items().placed().ids()[0].value(), 10);
        assert_eq!(world.visual_count(), 1);
    }

    #[test]
    fn loadout_overflow_is_placed_near_spawn() {
        let mut world = HeadlessWorld::new();
        let mut bus = MessageBus::new();
        let request = SessionRequest::new("farmhouse", "wraith")
            .with_loadout(["emf_reader", "flashlight", "thermometer", "salt", "lighter"]);

        let session = start(request, &mut world, &mut bus);

        assert_eq!(session.items().inventory().general_count(), 3);
        assert!(session.items().inventory().has_lighter());
        // crucifix from the layout plus the salt that did not fit
        assert_eq!(session.items().placed().len(), 2);
    }

    #[test]
    fn teardown_leaves_nothing_behind() {
        let mut world = HeadlessWorld::new();
        let mut bus = MessageBus::new();
        let mut session = start(SessionRequest::new("farmhouse", "wraith"), &mut world, &mut bus);

        session.teardown(&mut world);

        assert_eq!(world.visual_count(), 0);
        assert!(session.index().is_empty());
        assert!(session.doors().is_empty());
        assert!(session.items().placed().is_empty());
    }
}
