//! In-memory model of the host server's type registries.
//!
//! Everything here is built once from the vanilla table and then frozen. The
//! only way to add to a frozen registry is the [`patch::AppendEntry`]
//! extension point.

pub mod block;
pub mod components;
pub mod creative;
pub mod data;
pub mod dictionary;
pub mod item;
pub mod parser;
pub mod patch;
pub mod vanilla;

pub use block::Block;
pub use components::{Component, ComponentList, ComponentValue};
pub use creative::{CreativeCategory, CreativeGroup, CreativeInventory};
pub use data::DataHandlers;
pub use dictionary::{TypeDictionary, TypeEntry};
pub use item::{Item, ItemCapabilities};
pub use parser::{ItemParser, Prototype};
pub use patch::{AppendEntry, BlockItemIdMap, PatchError};

/// Shared behaviour of registries with a registration phase.
pub trait RegistryExt {
    /// Ends the registration phase. Later `register` calls panic.
    fn freeze(&mut self);
}

/// Every host registry a custom type has to be visible in.
///
/// One value of this type is owned by the main context, and each worker
/// context owns its own copy built from the same vanilla table.
#[derive(Debug, Clone)]
pub struct HostRegistries {
    /// Item type dictionary sent to clients.
    pub item_types: TypeDictionary,
    /// Block palette, keyed by block type id.
    pub block_palette: TypeDictionary,
    /// Item identifier to block identifier for items that place blocks.
    pub block_item_ids: BlockItemIdMap,
    /// Creative inventory contents.
    pub creative: CreativeInventory,
    /// String to item lookup used by commands and configs.
    pub items: ItemParser,
    /// Item save data serializers and deserializers.
    pub item_data: DataHandlers<Item>,
    /// Block save data serializers and deserializers.
    pub block_data: DataHandlers<Block>,
}

impl HostRegistries {
    /// Builds the host registries from the vanilla table and freezes them.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut item_types = TypeDictionary::new();
        let mut block_palette = TypeDictionary::new();
        let mut items = ItemParser::new();
        let mut item_data: DataHandlers<Item> = DataHandlers::new();
        let mut block_data: DataHandlers<Block> = DataHandlers::new();
        let mut block_item_ids = BlockItemIdMap::new();

        for block in vanilla::BLOCKS {
            let proto = block.to_block();
            block_palette.register(TypeEntry::plain(proto.identifier.clone(), block.id, 0));
            item_types.register(TypeEntry::plain(
                proto.identifier.clone(),
                block.id,
                TypeEntry::BLOCK_ITEM_VERSION,
            ));
            block_data.register(proto.identifier.clone(), proto.type_id, proto.clone());
            block_item_ids.register(proto.identifier.clone(), proto.identifier.clone());
            items.register(proto.identifier.clone(), Prototype::Block(proto.into()));
        }
        for item in vanilla::ITEMS {
            let proto = item.to_item();
            item_types.register(TypeEntry::plain(
                proto.identifier.clone(),
                item.id,
                TypeEntry::PLAIN_ITEM_VERSION,
            ));
            item_data.register(proto.identifier.clone(), proto.type_id, proto.clone());
            items.register(proto.identifier.clone(), Prototype::Item(proto.into()));
        }

        let creative = CreativeInventory::vanilla();

        item_types.freeze();
        block_palette.freeze();
        block_item_ids.freeze();

        log::debug!(
            "Loaded {} vanilla item types and {} vanilla blocks",
            item_types.len(),
            block_palette.len()
        );

        Self {
            item_types,
            block_palette,
            block_item_ids,
            creative,
            items,
            item_data,
            block_data,
        }
    }
}

impl Default for HostRegistries {
    fn default() -> Self {
        Self::vanilla()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_utils::Identifier;

    #[test]
    fn vanilla_registries_are_consistent() {
        let host = HostRegistries::vanilla();
        host.item_types.check_shape().unwrap();
        host.block_palette.check_shape().unwrap();
        assert!(host.item_types.is_frozen());

        let stone = Identifier::vanilla_static("stone");
        assert!(host.block_palette.from_string_id(&stone).is_some());
        assert_eq!(host.block_item_ids.block_for(&stone), Some(&stone));
        assert!(host.items.parse(&stone).is_some());
    }
}
