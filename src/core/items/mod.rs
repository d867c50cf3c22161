//=========================================================================
// Items
//=========================================================================
//
// Item catalog, inventory, placed instances and their lifecycle.
//
// Architecture:
//   ItemCatalog (Arc, read-only) ──> ItemLifecycleManager
//                                      ├─ Inventory   (3 general + lighter)
//                                      └─ PlacedItems (world instances)
//
//=========================================================================

//=== Module Declarations =================================================

mod catalog;
mod inventory;
mod manager;
mod placed;

//=== Public API ==========================================================

pub use catalog::{ItemCatalog, ItemDef, ItemId, Primary, Secondary, SensorKind, UseKind};
pub use inventory::{HeldItem, Inventory, GENERAL_SLOTS, LIGHTER_SLOT, SLOT_COUNT};
pub use manager::{Aim, ItemContext, ItemLifecycleManager};
pub use placed::{InstanceId, PlacedItem, PlacedItems};
