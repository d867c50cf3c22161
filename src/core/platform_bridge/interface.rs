//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-core message types.
//
// Everything that reaches the simulation from outside (window input, UI
// intents, asset loader completions) is one of these values. They are
// queued and processed in arrival order at the start of the next tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::Vec3;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;
use crate::core::items::ItemId;
use crate::core::world::HouseLayout;

//=== LoadTicket ==========================================================

/// Identifies one asset load attempt.
///
/// Each entry into `Loading` issues a fresh ticket; completions carrying
/// any other ticket belong to a torn-down session and are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub(crate) u64);

impl LoadTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

//=== SessionRequest ======================================================

/// Map and entity selection confirmed in the main menu.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SessionRequest {
    /// Map identifier understood by the asset loader.
    pub map: String,
    /// Hidden entity type for this session.
    pub entity: String,
    /// Items handed to the player at spawn, in slot order.
    #[serde(default)]
    pub loadout: Vec<ItemId>,
}

impl SessionRequest {
    pub fn new(map: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            entity: entity.into(),
            loadout: Vec::new(),
        }
    }

    pub fn with_loadout<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.loadout = items.into_iter().map(Into::into).collect();
        self
    }
}

//=== UserIntent ==========================================================

/// Discrete requests from the presentational UI or an external producer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// Menu confirmed: tear down and load a new session.
    StartSession(SessionRequest),

    /// Hard reset back to the main menu.
    ReturnToMenu,

    /// Journal hypothesis submitted (only accepted in `Journal`).
    SubmitGuess(String),

    ToggleMute,

    /// New ghost target from the (external) entity AI.
    SetGhostTarget(Vec3),

    /// Sensor values from the (external) evidence model.
    SetSensorReadings { emf: f32, parabolic: f32 },
}

//=== HostEvent ===========================================================

/// Events sent from the host (platform, UI, loader) to the core.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Batched input events for a frame.
    Inputs(Vec<InputEvent>),

    Intent(UserIntent),

    /// Intermediate loader progress.
    LoadProgress {
        ticket: LoadTicket,
        percent: f32,
        message: String,
    },

    /// Loader finished; the layout replaces any previous session's.
    AssetsReady {
        ticket: LoadTicket,
        layout: HouseLayout,
    },

    /// Loader gave up.
    AssetsFailed { ticket: LoadTicket, reason: String },

    /// Window close requested.
    WindowClosed,
}

impl HostEvent {
    /// Ticket carried by loader events.
    pub fn ticket(&self) -> Option<LoadTicket> {
        match self {
            Self::LoadProgress { ticket, .. }
            | Self::AssetsReady { ticket, .. }
            | Self::AssetsFailed { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_events_expose_their_ticket() {
        let event = HostEvent::AssetsFailed {
            ticket: LoadTicket(7),
            reason: "gone".into(),
        };
        assert_eq!(event.ticket(), Some(LoadTicket(7)));
        assert_eq!(HostEvent::WindowClosed.ticket(), None);
    }

    #[test]
    fn session_request_builder_collects_loadout() {
        let request = SessionRequest::new("farmhouse", "wraith").with_loadout(["emf_reader", "lighter"]);
        assert_eq!(request.loadout, vec![ItemId::from("emf_reader"), ItemId::from("lighter")]);
    }

    #[test]
    fn session_request_from_json() {
        let request: SessionRequest =
            serde_json::from_str(r#"{ "map": "asylum", "entity": "banshee" }"#).unwrap();
        assert_eq!(request.map, "asylum");
        assert!(request.loadout.is_empty());
    }

    #[test]
    fn ticket_display() {
        assert_eq!(LoadTicket(3).to_string(), "load#3");
    }
}
