//! The fixed vanilla content the host registries start from.
//!
//! Only a representative slice of the vanilla game. Custom ids start well
//! above the highest id in here.

use kiln_utils::Identifier;

use crate::{block::Block, item::Item};

/// A vanilla block row.
pub struct VanillaBlock {
    /// Block palette id.
    pub id: i32,
    /// Path under the `minecraft` namespace.
    pub path: &'static str,
    /// Name shown to players.
    pub display_name: &'static str,
}

/// A vanilla item row.
pub struct VanillaItem {
    /// Item type id.
    pub id: i32,
    /// Path under the `minecraft` namespace.
    pub path: &'static str,
    /// Name shown to players.
    pub display_name: &'static str,
    /// Stack size limit.
    pub max_stack_size: i32,
}

impl VanillaBlock {
    /// Builds the registered block.
    #[must_use]
    pub fn to_block(&self) -> Block {
        let mut block = Block::new(Identifier::vanilla_static(self.path), self.display_name);
        block.type_id = self.id;
        block
    }
}

impl VanillaItem {
    /// Builds the registered item.
    #[must_use]
    pub fn to_item(&self) -> Item {
        let mut item = Item::new(Identifier::vanilla_static(self.path))
            .with_display_name(self.display_name)
            .with_max_stack_size(self.max_stack_size);
        item.type_id = self.id;
        item
    }
}

const fn block(id: i32, path: &'static str, display_name: &'static str) -> VanillaBlock {
    VanillaBlock {
        id,
        path,
        display_name,
    }
}

const fn item(
    id: i32,
    path: &'static str,
    display_name: &'static str,
    max_stack_size: i32,
) -> VanillaItem {
    VanillaItem {
        id,
        path,
        display_name,
        max_stack_size,
    }
}

/// Vanilla block palette.
pub static BLOCKS: &[VanillaBlock] = &[
    block(1, "stone", "Stone"),
    block(2, "grass_block", "Grass Block"),
    block(3, "dirt", "Dirt"),
    block(4, "cobblestone", "Cobblestone"),
    block(5, "oak_planks", "Oak Planks"),
    block(7, "bedrock", "Bedrock"),
    block(12, "sand", "Sand"),
    block(13, "gravel", "Gravel"),
    block(17, "oak_log", "Oak Log"),
    block(20, "glass", "Glass"),
    block(56, "diamond_ore", "Diamond Ore"),
    block(57, "diamond_block", "Block of Diamond"),
];

/// Vanilla item table.
pub static ITEMS: &[VanillaItem] = &[
    item(256, "iron_shovel", "Iron Shovel", 1),
    item(257, "iron_pickaxe", "Iron Pickaxe", 1),
    item(260, "apple", "Apple", 64),
    item(261, "bow", "Bow", 1),
    item(262, "arrow", "Arrow", 64),
    item(263, "coal", "Coal", 64),
    item(264, "diamond", "Diamond", 64),
    item(267, "iron_sword", "Iron Sword", 1),
    item(280, "stick", "Stick", 64),
    item(297, "bread", "Bread", 64),
    item(332, "snowball", "Snowball", 16),
    item(373, "potion", "Potion", 1),
];

/// Highest id used by the vanilla tables.
#[must_use]
pub fn max_vanilla_id() -> i32 {
    BLOCKS
        .iter()
        .map(|b| b.id)
        .chain(ITEMS.iter().map(|i| i.id))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn ids_and_paths_are_unique() {
        let mut ids = FxHashSet::default();
        let mut paths = FxHashSet::default();
        for (id, path) in BLOCKS
            .iter()
            .map(|b| (b.id, b.path))
            .chain(ITEMS.iter().map(|i| (i.id, i.path)))
        {
            assert!(ids.insert(id), "duplicate vanilla id {id}");
            assert!(paths.insert(path), "duplicate vanilla path {path}");
            assert!(Identifier::validate_path(path));
        }
        assert_eq!(max_vanilla_id(), 373);
    }
}
