//=========================================================================
// Inventory
//=========================================================================
//
// Three general slots plus the lighter slot, and the selection cursor.
//
// Slot indices 0..=2 are general, 3 is the lighter slot. The lighter
// slot only ever holds slotless items and never counts toward capacity.
// The equipped item is whatever the cursor points at; an empty slot
// under the cursor means nothing is equipped.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::catalog::ItemId;
use crate::core::error::InventoryError;

//=== Constants ===========================================================

pub const GENERAL_SLOTS: usize = 3;
pub const LIGHTER_SLOT: usize = GENERAL_SLOTS;
pub const SLOT_COUNT: usize = GENERAL_SLOTS + 1;

//=== HeldItem ============================================================

/// An item instance in the inventory. Carries per-instance state so it
/// survives place/pick-up round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldItem {
    pub item: ItemId,
    pub uses: Option<u32>,
    pub powered: bool,
    pub alt_mode: bool,
}

impl HeldItem {
    pub fn new(item: ItemId, uses: Option<u32>) -> Self {
        Self {
            item,
            uses,
            powered: false,
            alt_mode: false,
        }
    }
}

//=== Inventory ===========================================================

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    slots: [Option<HeldItem>; SLOT_COUNT],
    cursor: Option<usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Slots ------------------------------------------------------------

    pub fn slot(&self, index: usize) -> Option<&HeldItem> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut HeldItem> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Puts an item into the first free general slot, or the lighter slot
    /// for slotless items. Returns the slot index.
    pub fn insert(&mut self, held: HeldItem, slotless: bool) -> Result<usize, InventoryError> {
        let index = if slotless {
            Some(LIGHTER_SLOT).filter(|&i| self.slots[i].is_none())
        } else {
            self.slots[..GENERAL_SLOTS].iter().position(Option::is_none)
        };

        let index = index.ok_or(InventoryError::Full)?;
        self.slots[index] = Some(held);
        Ok(index)
    }

    /// Removes and returns a slot's item.
    pub fn take(&mut self, index: usize) -> Option<HeldItem> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Returns `true` if an item of this kind could be inserted.
    pub fn has_room(&self, slotless: bool) -> bool {
        if slotless {
            self.slots[LIGHTER_SLOT].is_none()
        } else {
            self.slots[..GENERAL_SLOTS].iter().any(Option::is_none)
        }
    }

    /// Number of occupied general slots.
    pub fn general_count(&self) -> usize {
        self.slots[..GENERAL_SLOTS].iter().filter(|s| s.is_some()).count()
    }

    pub fn has_lighter(&self) -> bool {
        self.slots[LIGHTER_SLOT].is_some()
    }

    /// Occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &HeldItem)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|held| (i, held)))
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
        self.cursor = None;
    }

    //--- Selection --------------------------------------------------------

    /// Points the cursor at `index`. Out-of-range indices clear it.
    pub fn select(&mut self, index: usize) -> Option<&HeldItem> {
        self.cursor = (index < SLOT_COUNT).then_some(index);
        self.equipped().map(|(_, held)| held)
    }

    /// Moves the cursor by `step` slots, wrapping around.
    pub fn cycle(&mut self, step: i32) -> Option<&HeldItem> {
        let from = self.cursor.unwrap_or(0) as i32;
        let to = (from + step).rem_euclid(SLOT_COUNT as i32) as usize;
        self.select(to)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The equipped slot and item: the cursor's slot, if occupied.
    pub fn equipped(&self) -> Option<(usize, &HeldItem)> {
        let index = self.cursor?;
        self.slot(index).map(|held| (index, held))
    }

    pub fn equipped_mut(&mut self) -> Option<(usize, &mut HeldItem)> {
        let index = self.cursor?;
        self.slot_mut(index).map(|held| (index, held))
    }

    /// Index of the equipped slot; never points at an empty slot.
    pub fn equipped_index(&self) -> Option<usize> {
        self.equipped().map(|(index, _)| index)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
