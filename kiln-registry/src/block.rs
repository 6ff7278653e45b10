//! Block prototypes.

use kiln_utils::Identifier;

use crate::{components::ComponentList, item::Item};

/// A block type.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Numeric block type id. Zero until the block is registered.
    pub type_id: i32,
    /// Namespaced block name.
    pub identifier: Identifier,
    /// Name shown to players.
    pub display_name: String,
    /// Client-visible block components.
    pub components: ComponentList,
}

impl Block {
    /// An unregistered block without components.
    #[must_use]
    pub fn new(identifier: Identifier, display_name: impl Into<String>) -> Self {
        Self {
            type_id: 0,
            identifier,
            display_name: display_name.into(),
            components: ComponentList::new(),
        }
    }

    /// Replaces the block's components.
    #[must_use]
    pub fn with_components(mut self, components: ComponentList) -> Self {
        self.components = components;
        self
    }

    /// The item that places this block. It shares the block's id and identifier.
    #[must_use]
    pub fn as_item(&self) -> Item {
        let mut item = Item::new(self.identifier.clone()).with_display_name(&self.display_name);
        item.type_id = self.type_id;
        item
    }
}
