//=========================================================================
// Notifications
//=========================================================================
//
// Messages the core publishes on the MessageBus for the presentational
// UI, the audio collaborator and the renderer.
//
// All of them are plain data. They are readable by any number of
// consumers after a tick and cleared when the next tick starts.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::doors::DoorId;
use super::entity_index::Interactable;
use super::error::InventoryError;
use super::items::{InstanceId, ItemId};
use super::platform_bridge::LoadTicket;
use super::rooms::Location;
use super::state::GameState;
use super::surveillance::CameraFeedBinding;

//=== Game Flow ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub from: GameState,
    pub to: GameState,
}

/// Loading screen update.
///
/// `terminal` marks the last message of a failed load: the game stays in
/// `Loading` until the user returns to the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingProgress {
    pub ticket: LoadTicket,
    pub percent: f32,
    pub message: String,
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalGuess {
    pub guess: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteToggled {
    pub muted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorMenu {
    pub open: bool,
}

//=== Player ==============================================================

/// HUD snapshot, published every gameplay tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub stamina: f32,
    pub sanity: f32,
    pub crouching: bool,
    pub sprinting: bool,
    pub equipped: Option<ItemId>,
    pub room: &'static str,
    pub focus: bool,
    /// Only while a powered EMF reader is equipped.
    pub emf: Option<f32>,
    /// Only while a powered parabolic microphone is equipped.
    pub parabolic: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChanged {
    pub focus: Option<Interactable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomChanged {
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footstep {
    pub position: Vec3,
    pub indoor: bool,
    pub sprinting: bool,
}

//=== Items ===============================================================

/// Inventory and placed-item changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    Equipped { slot: Option<usize>, item: Option<ItemId> },
    Placed { instance: InstanceId, item: ItemId, position: Vec3, yaw: f32 },
    Dropped { instance: InstanceId, item: ItemId, position: Vec3, yaw: f32 },
    PickedUp { instance: InstanceId, item: ItemId, slot: usize },
    Consumed { item: ItemId },
    HeldPowerToggled { item: ItemId, on: bool },
    PlacedPowerToggled { instance: InstanceId, item: ItemId, on: bool },
    AltModeToggled { item: ItemId, on: bool },
    Mounted { camera: InstanceId, tripod: InstanceId },
    Detached { camera: InstanceId, tripod: InstanceId, slot: usize },
    Rejected { reason: InventoryError },
}

/// Effects of primary use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemUsed {
    PhotoCaptured { remaining: u32 },
    SanityRestored { amount: f32, sanity: f32 },
    SmudgeIgnited { position: Vec3 },
}

//=== World ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorToggled {
    pub door: DoorId,
    pub open: bool,
}

/// Live door angle while a swing is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorAngle {
    pub door: DoorId,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostMoved {
    pub position: Vec3,
}

/// New monitor routing; only published when it changed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedsChanged {
    pub bindings: Vec<CameraFeedBinding>,
}
