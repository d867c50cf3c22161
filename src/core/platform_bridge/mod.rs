//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host (window layer, UI, asset loader) with the core.
//
// This module defines the contract between host-side producers and the
// simulation thread, so the window backend or the loader can be swapped
// without touching core code.
//
// Components:
// - `interface`: host event types (the contract)
// - `event_collector`: core-side bounded draining of the channel
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub use interface::{HostEvent, LoadTicket, SessionRequest, UserIntent};

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
