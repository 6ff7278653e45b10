//! Creative inventory placement of custom items.

use kiln_registry::CreativeCategory;

use crate::error::RegistrationError;

/// Where a custom item shows up in the creative inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreativeInventoryInfo {
    category: String,
    group: String,
}

impl CreativeInventoryInfo {
    /// Valid category shown in no tab.
    pub const CATEGORY_ALL: &'static str = "all";
    /// Command-only items, shown in no tab.
    pub const CATEGORY_COMMANDS: &'static str = "commands";
    /// Construction tab.
    pub const CATEGORY_CONSTRUCTION: &'static str = "construction";
    /// Equipment tab.
    pub const CATEGORY_EQUIPMENT: &'static str = "equipment";
    /// Items tab.
    pub const CATEGORY_ITEMS: &'static str = "items";
    /// Nature tab.
    pub const CATEGORY_NATURE: &'static str = "nature";
    /// Hidden from the creative inventory.
    pub const CATEGORY_NONE: &'static str = "none";

    /// No group.
    pub const GROUP_NONE: &'static str = "none";
    /// Vanilla planks group.
    pub const GROUP_PLANKS: &'static str = "itemGroup.name.planks";
    /// Vanilla sword group.
    pub const GROUP_SWORD: &'static str = "itemGroup.name.sword";
    /// Vanilla pickaxe group.
    pub const GROUP_PICKAXE: &'static str = "itemGroup.name.pickaxe";
    /// Vanilla ore group.
    pub const GROUP_ORE: &'static str = "itemGroup.name.ore";
    /// Vanilla mineral group.
    pub const GROUP_MINERAL: &'static str = "itemGroup.name.mineral";
    /// Vanilla helmet group.
    pub const GROUP_HELMET: &'static str = "itemGroup.name.helmet";
    /// Vanilla crop group.
    pub const GROUP_CROP: &'static str = "itemGroup.name.crop";

    /// Info for `category` and `group`.
    #[must_use]
    pub fn new(category: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            group: group.into(),
        }
    }

    /// Info for an item in `category` without a group.
    #[must_use]
    pub fn ungrouped(category: impl Into<String>) -> Self {
        Self::new(category, "")
    }

    /// Category name as given.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Group name as given, possibly empty.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Category code sent in item metadata.
    #[must_use]
    pub fn numeric_category(&self) -> i32 {
        match self.category.as_str() {
            Self::CATEGORY_CONSTRUCTION => 1,
            Self::CATEGORY_NATURE => 2,
            Self::CATEGORY_EQUIPMENT => 3,
            Self::CATEGORY_ITEMS => 4,
            _ => 0,
        }
    }

    /// The creative tab to add the item to.
    ///
    /// `all`, `commands` and `none` are valid but not shown in any tab.
    pub fn host_category(&self) -> Result<Option<CreativeCategory>, RegistrationError> {
        Ok(Some(match self.category.as_str() {
            Self::CATEGORY_CONSTRUCTION => CreativeCategory::Construction,
            Self::CATEGORY_NATURE => CreativeCategory::Nature,
            Self::CATEGORY_EQUIPMENT => CreativeCategory::Equipment,
            Self::CATEGORY_ITEMS => CreativeCategory::Items,
            Self::CATEGORY_ALL | Self::CATEGORY_COMMANDS | Self::CATEGORY_NONE => return Ok(None),
            other => return Err(RegistrationError::UnknownCategory(other.to_owned())),
        }))
    }

    /// The group name, or `None` when the item is ungrouped.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        match self.group.as_str() {
            "" | Self::GROUP_NONE => None,
            group => Some(group),
        }
    }
}
