//! Creative inventory contents.

use std::sync::Arc;

use kiln_utils::Identifier;

use crate::item::Item;

/// Tab of the creative inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CreativeCategory {
    Construction,
    Nature,
    Equipment,
    Items,
}

/// A collapsible group inside a creative tab, shown with an icon item.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeGroup {
    /// Translation key of the group name.
    pub name: String,
    /// Item shown on the collapsed group.
    pub icon: Item,
}

impl CreativeGroup {
    /// A group named `name` shown with `icon`.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: Item) -> Self {
        Self {
            name: name.into(),
            icon,
        }
    }
}

/// One item shown in the creative inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeEntry {
    /// The shown item.
    pub item: Item,
    /// Tab it is shown in.
    pub category: CreativeCategory,
    /// Group it is collapsed into, if any.
    pub group: Option<Arc<CreativeGroup>>,
}

/// Items shown in the creative inventory, in display order.
#[derive(Debug, Clone, Default)]
pub struct CreativeInventory {
    entries: Vec<CreativeEntry>,
}

impl CreativeInventory {
    /// An empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The vanilla creative layout for the vanilla table.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut inventory = Self::new();
        let planks = Item::new(Identifier::vanilla_static("oak_planks")).with_display_name("Oak Planks");
        let planks_group = Arc::new(CreativeGroup::new("itemGroup.name.planks", planks.clone()));
        inventory.add(planks, CreativeCategory::Construction, Some(planks_group));
        inventory.add(
            Item::new(Identifier::vanilla_static("stone")).with_display_name("Stone"),
            CreativeCategory::Construction,
            None,
        );
        let sword = Item::new(Identifier::vanilla_static("iron_sword"))
            .with_display_name("Iron Sword")
            .with_max_stack_size(1);
        let sword_group = Arc::new(CreativeGroup::new("itemGroup.name.sword", sword.clone()));
        inventory.add(sword, CreativeCategory::Equipment, Some(sword_group));
        inventory.add(
            Item::new(Identifier::vanilla_static("apple")).with_display_name("Apple"),
            CreativeCategory::Nature,
            None,
        );
        inventory.add(
            Item::new(Identifier::vanilla_static("stick")).with_display_name("Stick"),
            CreativeCategory::Items,
            None,
        );
        inventory
    }

    /// Appends an entry at the end of `category`.
    pub fn add(&mut self, item: Item, category: CreativeCategory, group: Option<Arc<CreativeGroup>>) {
        self.entries.push(CreativeEntry {
            item,
            category,
            group,
        });
    }

    /// Removes every entry for `identifier`, returning how many were removed.
    pub fn remove(&mut self, identifier: &Identifier) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| &e.item.identifier != identifier);
        before - self.entries.len()
    }

    /// Every entry in display order.
    #[must_use]
    pub fn all_entries(&self) -> &[CreativeEntry] {
        &self.entries
    }

    /// Whether an item with `identifier` is shown anywhere.
    #[must_use]
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.entries.iter().any(|e| &e.item.identifier == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_layout_has_groups() {
        let inventory = CreativeInventory::vanilla();
        let groups: Vec<_> = inventory
            .all_entries()
            .iter()
            .filter_map(|e| e.group.as_ref().map(|g| g.name.as_str()))
            .collect();
        assert_eq!(groups, ["itemGroup.name.planks", "itemGroup.name.sword"]);
        assert!(inventory.contains(&Identifier::vanilla_static("stick")));
    }

    #[test]
    fn remove_drops_all_matching_entries() {
        let mut inventory = CreativeInventory::vanilla();
        let stick = Identifier::vanilla_static("stick");
        assert_eq!(inventory.remove(&stick), 1);
        assert!(!inventory.contains(&stick));
        assert_eq!(inventory.remove(&stick), 0);
    }
}
