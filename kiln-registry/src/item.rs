//! Item prototypes and stacks.

use kiln_utils::Identifier;

use crate::components::{ComponentList, WearableSlot};

/// Armor data of a wearable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armor {
    /// Slot it is worn in.
    pub slot: WearableSlot,
    /// Armor points.
    pub defense_points: i32,
}

/// Food data of a consumable item. Consumables without it are drinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    /// Only edible while hungry.
    pub requires_hunger: bool,
}

/// Data of an item that is eaten or drunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consumable {
    /// Food data, absent for drinks.
    pub food: Option<Food>,
}

/// Tool family of a hand-equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ToolKind {
    Sword,
    Pickaxe,
    Axe,
    Shovel,
    Hoe,
}

/// What an item can do. Drives the default component set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemCapabilities {
    /// Set for wearable items.
    pub armor: Option<Armor>,
    /// Set for food and drinks.
    pub consumable: Option<Consumable>,
    /// Uses before the item breaks, if it wears out.
    pub max_durability: Option<i32>,
    /// Whether the item is fired as a projectile.
    pub projectile: bool,
    /// Burn time in ticks, zero when the item is not a fuel.
    pub fuel_time: i32,
    /// Attack damage.
    pub attack_points: i32,
    /// Tool family, if the item is a tool.
    pub tool: Option<ToolKind>,
}

/// An item type or a stack of it.
///
/// Registered items act as prototypes: lookups hand out clones, so changing
/// a stack never touches the registered value.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Numeric type id. Zero until the item is registered.
    pub type_id: i32,
    /// Namespaced item name.
    pub identifier: Identifier,
    /// Display name, `Unknown` when none was given.
    pub display_name: String,
    /// Stack size of this value.
    pub count: u32,
    /// Stack size limit.
    pub max_stack_size: i32,
    /// What the item can do.
    pub capabilities: ItemCapabilities,
    /// Component data for component based items.
    pub components: Option<ComponentList>,
}

impl Item {
    /// Display name used when an item has none.
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// A plain item with a stack size of 64 and no components.
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self {
            type_id: 0,
            identifier,
            display_name: Self::UNKNOWN_NAME.to_owned(),
            count: 1,
            max_stack_size: 64,
            capabilities: ItemCapabilities::default(),
            components: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Sets the stack size limit.
    #[must_use]
    pub fn with_max_stack_size(mut self, size: i32) -> Self {
        self.max_stack_size = size;
        self
    }

    /// Sets the capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: ItemCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Turns this into a component based item.
    #[must_use]
    pub fn with_components(mut self, components: ComponentList) -> Self {
        self.components = Some(components);
        self
    }

    /// Whether the item carries component data.
    #[must_use]
    pub fn is_component_based(&self) -> bool {
        self.components.is_some()
    }

    /// Returns a copy of this item with `count` items in the stack.
    #[must_use]
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }
}
