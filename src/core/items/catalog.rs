//=========================================================================
// Item Catalog
//=========================================================================
//
// Immutable item descriptors, loaded once per process.
//
// Behaviour is data: what the primary and secondary actions do, whether
// the item has a power switch, how many uses it has. Adding an item is
// a catalog entry, never a new branch in the item manager.
//
// JSON form (array of entries):
// ```text
// [{ "id": "salt", "name": "Salt", "asset": "items/salt.glb",
//    "primary": { "kind": "place" } }]
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::error::CatalogError;

//=== ItemId ==============================================================

/// Catalog identifier of an item type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=== Behaviour Descriptors ===============================================

/// One-shot or counted use effects.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UseKind {
    /// Take a photo (counted, the camera stays when empty).
    CapturePhoto,
    /// Swallow medication: raises sanity by `amount`.
    RestoreSanity { amount: f32 },
    /// Light a smudge stick. Needs a lighter.
    IgniteSmudge,
}

impl UseKind {
    /// Consumable items leave the inventory when their last use is spent.
    pub fn consumes_item(&self) -> bool {
        !matches!(self, Self::CapturePhoto)
    }
}

/// What the primary action does with the equipped item.
///
/// Placing and using are distinct variants: an item is one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primary {
    #[default]
    None,
    /// Anchor in the world. `toggleable` placed instances have an on/off flag.
    Place {
        #[serde(default)]
        toggleable: bool,
    },
    Use { action: UseKind },
}

/// What the secondary action does with the equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Secondary {
    #[default]
    None,
    TogglePower,
    /// Alternate visual mode (night vision on the video camera).
    ToggleAltMode,
}

/// Sensor values shown while the item is held and powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Emf,
    Parabolic,
}

//=== ItemDef =============================================================

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    /// Model reference handed to the renderer.
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub primary: Primary,
    #[serde(default)]
    pub secondary: Secondary,
    /// Has an on/off switch.
    #[serde(default)]
    pub powered: bool,
    /// Remaining-uses counter for fresh instances.
    #[serde(default)]
    pub uses: Option<u32>,
    /// Lives in the lighter slot instead of a general slot.
    #[serde(default)]
    pub slotless: bool,
    #[serde(default)]
    pub requires_lighter: bool,
    /// Can be mounted onto a mount point.
    #[serde(default)]
    pub mountable: bool,
    /// Accepts a mountable item when placed (tripod).
    #[serde(default)]
    pub mount_point: bool,
    /// Feeds the surveillance monitors when powered.
    #[serde(default)]
    pub camera_feed: bool,
    #[serde(default)]
    pub sensor: Option<SensorKind>,
}

impl ItemDef {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            asset: format!("items/{}.glb", id),
            primary: Primary::None,
            secondary: Secondary::None,
            powered: false,
            uses: None,
            slotless: false,
            requires_lighter: false,
            mountable: false,
            mount_point: false,
            camera_feed: false,
            sensor: None,
        }
    }

    fn device(id: &str, name: &str) -> Self {
        Self {
            powered: true,
            secondary: Secondary::TogglePower,
            ..Self::new(id, name)
        }
    }

    fn placeable(id: &str, name: &str, toggleable: bool) -> Self {
        Self {
            primary: Primary::Place { toggleable },
            powered: toggleable,
            ..Self::new(id, name)
        }
    }

    fn usable(id: &str, name: &str, action: UseKind, uses: u32) -> Self {
        Self {
            primary: Primary::Use { action },
            uses: Some(uses),
            ..Self::new(id, name)
        }
    }

    pub fn is_placeable(&self) -> bool {
        matches!(self.primary, Primary::Place { .. })
    }

    /// Placed instances of this item carry an on/off flag.
    pub fn is_toggleable_when_placed(&self) -> bool {
        match self.primary {
            Primary::Place { toggleable } => toggleable,
            _ => self.powered,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::Invalid {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.uses == Some(0) {
            return Err(invalid("uses must be at least 1"));
        }
        if matches!(self.primary, Primary::Use { .. }) && self.uses.is_none() {
            return Err(invalid("usable items need a uses counter"));
        }
        if self.mountable && !self.is_placeable() {
            return Err(invalid("mountable items must be placeable"));
        }
        if self.mount_point && !self.is_placeable() {
            return Err(invalid("mount points must be placeable"));
        }
        if self.secondary == Secondary::TogglePower && !self.powered {
            return Err(invalid("power toggle on an item without power"));
        }
        Ok(())
    }
}

//=== ItemCatalog =========================================================

/// Read-only item table.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: HashMap<ItemId, ItemDef>,
    order: Vec<ItemId>,
}

impl ItemCatalog {
    /// Builds a catalog from entries, rejecting duplicates and
    /// inconsistent descriptors.
    pub fn new(entries: Vec<ItemDef>) -> Result<Self, CatalogError> {
        let mut items = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());

        for def in entries {
            def.validate()?;
            if items.contains_key(&def.id) {
                return Err(CatalogError::Duplicate(def.id));
            }
            order.push(def.id.clone());
            items.insert(def.id.clone(), def);
        }

        Ok(Self { items, order })
    }

    /// Parses a JSON array of entries.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ItemDef> = serde_json::from_str(text)?;
        Self::new(entries)
    }

    /// The standard investigation kit.
    pub fn builtin() -> Self {
        use UseKind::*;

        let entries = vec![
            //--- Handheld devices -----------------------------------------
            ItemDef {
                sensor: Some(SensorKind::Emf),
                ..ItemDef::device("emf_reader", "EMF Reader")
            },
            ItemDef::device("flashlight", "Flashlight"),
            ItemDef::device("uv_light", "UV Light"),
            ItemDef::device("spirit_box", "Spirit Box"),
            ItemDef::device("thermometer", "Thermometer"),
            ItemDef {
                sensor: Some(SensorKind::Parabolic),
                ..ItemDef::device("parabolic_mic", "Parabolic Microphone")
            },
            ItemDef {
                slotless: true,
                ..ItemDef::device("lighter", "Lighter")
            },
            //--- Placeables -----------------------------------------------
            ItemDef {
                secondary: Secondary::ToggleAltMode,
                mountable: true,
                camera_feed: true,
                ..ItemDef::placeable("video_camera", "Video Camera", true)
            },
            ItemDef {
                mount_point: true,
                ..ItemDef::placeable("tripod", "Tripod", false)
            },
            ItemDef::placeable("dots_projector", "D.O.T.S. Projector", true),
            ItemDef::placeable("lantern", "Lantern", true),
            ItemDef::placeable("salt", "Salt", false),
            ItemDef::placeable("writing_book", "Writing Book", false),
            ItemDef::placeable("crucifix", "Crucifix", false),
            //--- Consumables ----------------------------------------------
            ItemDef::usable("photo_camera", "Photo Camera", CapturePhoto, 5),
            ItemDef::usable("sanity_pills", "Sanity Pills", RestoreSanity { amount: 40.0 }, 1),
            ItemDef {
                requires_lighter: true,
                ..ItemDef::usable("smudge_sticks", "Smudge Sticks", IgniteSmudge, 1)
            },
        ];

        let mut items = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        for def in entries {
            order.push(def.id.clone());
            items.insert(def.id.clone(), def);
        }
        Self { items, order }
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn def<'a>(catalog: &'a ItemCatalog, id: &str) -> &'a ItemDef {
        catalog.get(&ItemId::from(id)).unwrap()
    }

    #[test]
    fn builtin_entries_are_consistent() {
        let catalog = ItemCatalog::builtin();
        for item in catalog.iter() {
            assert!(item.validate().is_ok(), "{} failed validation", item.id);
        }
        assert_eq!(catalog.len(), 17);
    }

    #[test]
    fn no_item_is_both_placeable_and_usable() {
        let catalog = ItemCatalog::builtin();
        for item in catalog.iter() {
            let usable = matches!(item.primary, Primary::Use { .. });
            assert!(!(usable && item.is_placeable()), "{}", item.id);
        }
    }

    #[test]
    fn builtin_behaviour_table() {
        let catalog = ItemCatalog::builtin();

        let camera = def(&catalog, "video_camera");
        assert_eq!(camera.primary, Primary::Place { toggleable: true });
        assert_eq!(camera.secondary, Secondary::ToggleAltMode);
        assert!(camera.mountable && camera.camera_feed);

        assert_eq!(def(&catalog, "photo_camera").uses, Some(5));
        assert!(def(&catalog, "smudge_sticks").requires_lighter);
        assert!(def(&catalog, "lighter").slotless);
        assert!(def(&catalog, "tripod").mount_point);
        assert!(!def(&catalog, "salt").is_toggleable_when_placed());
        assert!(def(&catalog, "flashlight").is_toggleable_when_placed());
    }

    #[test]
    fn from_json_parses_tagged_descriptors() {
        let catalog = ItemCatalog::from_json(
            r#"[
                { "id": "incense", "name": "Incense",
                  "primary": { "kind": "use", "action": { "effect": "ignite_smudge" } },
                  "uses": 2, "requires_lighter": true },
                { "id": "motion_sensor", "name": "Motion Sensor",
                  "primary": { "kind": "place", "toggleable": true }, "powered": true },
                { "id": "candle", "name": "Candle" }
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(
            def(&catalog, "incense").primary,
            Primary::Use { action: UseKind::IgniteSmudge }
        );
        assert!(def(&catalog, "motion_sensor").is_placeable());
        assert_eq!(def(&catalog, "candle").primary, Primary::None);
        assert_eq!(
            catalog.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            vec!["incense", "motion_sensor", "candle"]
        );
    }

    #[test]
    fn from_json_rejects_duplicates() {
        let err = ItemCatalog::from_json(r#"[{ "id": "salt", "name": "A" }, { "id": "salt", "name": "B" }]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(id) if id.as_str() == "salt"));
    }

    #[test]
    fn from_json_rejects_usable_without_uses() {
        let err = ItemCatalog::from_json(
            r#"[{ "id": "pills", "name": "Pills",
                  "primary": { "kind": "use", "action": { "effect": "restore_sanity", "amount": 10 } } }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn photo_camera_is_not_consumed() {
        assert!(!UseKind::CapturePhoto.consumes_item());
        assert!(UseKind::RestoreSanity { amount: 1.0 }.consumes_item());
    }
}
