//=========================================================================
// Error Types
//=========================================================================
//
// Error enums shared across the core.
//
// None of these escape a tick as a panic: gameplay rejections are logged
// at `debug` and dropped, load failures become a terminal progress
// message, config and catalog errors surface at construction time.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::items::{InstanceId, ItemId};
use super::state::{GameState, StateRequest};

//=== LoadError ===========================================================

/// Why an asset load attempt ended without a playable session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("asset load timed out after {seconds:.1}s")]
    Timeout { seconds: f32 },

    #[error("asset load returned no geometry")]
    EmptyGeometry,

    #[error("asset load failed: {0}")]
    Failed(String),
}

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== CatalogError ========================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate catalog entry '{0}'")]
    Duplicate(ItemId),

    #[error("catalog entry '{id}': {reason}")]
    Invalid { id: ItemId, reason: String },
}

//=== InventoryError ======================================================

/// Rejected item operations. These are expected during play and never
/// leave the item manager in a partial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("inventory full")]
    Full,

    #[error("no item in the selected slot")]
    SlotEmpty,

    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),

    #[error("no placed instance {0}")]
    UnknownInstance(InstanceId),

    #[error("tripod {0} already carries a camera")]
    Occupied(InstanceId),

    #[error("tripod {0} carries no camera")]
    NotMounted(InstanceId),

    #[error("'{0}' needs a lighter")]
    MissingLighter(ItemId),

    #[error("'{0}' has no uses left")]
    Exhausted(ItemId),

    #[error("'{0}' cannot do that")]
    Unsupported(ItemId),
}

//=== TransitionError =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal transition {request:?} from {from:?}")]
    Illegal { from: GameState, request: StateRequest },
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=========================================================================
// Unit Tests
//=========================================================================
