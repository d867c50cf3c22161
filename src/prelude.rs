//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use haunt_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::game::Game;
pub use crate::core::{NullPresenter, Presenter};

// Configuration and errors
pub use crate::core::config::GameConfig;
pub use crate::core::error::{ConfigError, InventoryError, LoadError};

// Host contract
pub use crate::core::platform_bridge::{HostEvent, LoadTicket, SessionRequest, UserIntent};
pub use crate::core::world::{AssetLoader, HeadlessWorld, HouseLayout, NodeId, World};

// State and input
pub use crate::core::input::{Command, InputContext, InputEvent, KeyCode, MouseButton};
pub use crate::core::state::GameState;

// Items
pub use crate::core::items::{InstanceId, ItemCatalog, ItemId};

// Message bus
pub use crate::core::message_bus::MessageBus;
pub use crate::core::notify::*;
