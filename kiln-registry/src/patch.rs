//! Post-freeze extension point for host registries.
//!
//! Frozen registries reject `register`; custom content is added afterwards
//! through [`AppendEntry`], which merges additively and never drops an
//! existing entry. Callers are expected to run [`AppendEntry::check_shape`]
//! around every append and treat a failure as fatal.

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    RegistryExt,
    dictionary::{SHAPE_VERSION, TypeDictionary, TypeEntry},
};

/// Why an append was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The numeric id already belongs to another identifier.
    #[error("numeric id {id} is already bound to `{existing}`, cannot bind `{name}`")]
    IdTaken {
        /// Requested id.
        id: i32,
        /// Current owner of the id.
        existing: Identifier,
        /// Identifier that asked for it.
        name: Identifier,
    },
    /// The identifier already has another numeric id.
    #[error("`{name}` is already bound to numeric id {existing}, cannot rebind to {id}")]
    NameTaken {
        /// The identifier.
        name: Identifier,
        /// Id it is bound to.
        existing: i32,
        /// Id that was requested.
        id: i32,
    },
    /// The item already places a different block.
    #[error("block item `{item}` already maps to block `{existing}`")]
    BlockItemTaken {
        /// The block item.
        item: Identifier,
        /// Block it already places.
        existing: Identifier,
    },
    /// The registry does not have the layout this code was written against.
    #[error("registry shape mismatch: {0}")]
    Shape(String),
}

/// Narrow write access to a frozen registry.
pub trait AppendEntry {
    /// Value stored per appended entry.
    type Entry;

    /// Layout revision of the underlying tables.
    fn shape_version(&self) -> u32;

    /// Verifies the layout revision and that all internal tables agree.
    fn check_shape(&self) -> Result<(), PatchError>;

    /// Adds `entry` under `id` and `name`.
    ///
    /// Appending the same `(id, name)` pair again replaces the stored entry.
    fn append_entry(
        &mut self,
        id: i32,
        name: Identifier,
        entry: Self::Entry,
    ) -> Result<(), PatchError>;
}

impl AppendEntry for TypeDictionary {
    type Entry = TypeEntry;

    fn shape_version(&self) -> u32 {
        self.shape_version
    }

    fn check_shape(&self) -> Result<(), PatchError> {
        if self.shape_version != SHAPE_VERSION {
            return Err(PatchError::Shape(format!(
                "expected dictionary layout {SHAPE_VERSION}, found {}",
                self.shape_version
            )));
        }
        if self.int_to_string.len() != self.string_to_int.len()
            || self.entries.len() != self.int_to_string.len()
        {
            return Err(PatchError::Shape(format!(
                "table sizes disagree: {} ids, {} names, {} entries",
                self.int_to_string.len(),
                self.string_to_int.len(),
                self.entries.len()
            )));
        }
        for (id, name) in &self.int_to_string {
            if self.string_to_int.get(name) != Some(id) {
                return Err(PatchError::Shape(format!(
                    "id {id} maps to `{name}` but not the other way around"
                )));
            }
        }
        for entry in &self.entries {
            if self.int_to_string.get(&entry.numeric_id) != Some(&entry.identifier) {
                return Err(PatchError::Shape(format!(
                    "entry `{}` ({}) is missing from the lookup tables",
                    entry.identifier, entry.numeric_id
                )));
            }
        }
        Ok(())
    }

    fn append_entry(
        &mut self,
        id: i32,
        name: Identifier,
        entry: TypeEntry,
    ) -> Result<(), PatchError> {
        if entry.numeric_id != id || entry.identifier != name {
            return Err(PatchError::Shape(format!(
                "entry `{}` ({}) appended under `{name}` ({id})",
                entry.identifier, entry.numeric_id
            )));
        }
        if let Some(existing) = self.int_to_string.get(&id)
            && existing != &name
        {
            return Err(PatchError::IdTaken {
                id,
                existing: existing.clone(),
                name,
            });
        }
        if let Some(&existing) = self.string_to_int.get(&name)
            && existing != id
        {
            return Err(PatchError::NameTaken { name, existing, id });
        }

        if let Some(slot) = self.entries.iter_mut().find(|e| e.identifier == name) {
            *slot = entry;
        } else {
            self.int_to_string.insert(id, name.clone());
            self.string_to_int.insert(name, id);
            self.entries.push(entry);
        }
        Ok(())
    }
}

/// Item identifier to the identifier of the block it places.
#[derive(Debug, Clone)]
pub struct BlockItemIdMap {
    item_to_block: FxHashMap<Identifier, Identifier>,
    allows_registering: bool,
}

impl BlockItemIdMap {
    /// An empty, unfrozen map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            item_to_block: FxHashMap::default(),
            allows_registering: true,
        }
    }

    /// # Panics
    /// Panics if the map has been frozen.
    pub fn register(&mut self, item: Identifier, block: Identifier) {
        assert!(
            self.allows_registering,
            "Cannot register block item after registry is frozen"
        );
        self.item_to_block.insert(item, block);
    }

    /// The block `item` places.
    #[must_use]
    pub fn block_for(&self, item: &Identifier) -> Option<&Identifier> {
        self.item_to_block.get(item)
    }

    /// Adds a mapping after freezing. Re-adding the same mapping is accepted.
    pub fn append_mapping(&mut self, item: Identifier, block: Identifier) -> Result<(), PatchError> {
        if let Some(existing) = self.item_to_block.get(&item)
            && existing != &block
        {
            return Err(PatchError::BlockItemTaken {
                item,
                existing: existing.clone(),
            });
        }
        self.item_to_block.insert(item, block);
        Ok(())
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_to_block.len()
    }

    /// Whether there are no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_to_block.is_empty()
    }
}

impl Default for BlockItemIdMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for BlockItemIdMap {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use simdnbt::owned::{NbtCompound, NbtTag};

    use super::*;

    fn frozen_dictionary() -> TypeDictionary {
        let mut dict = TypeDictionary::new();
        dict.register(TypeEntry::plain(Identifier::vanilla_static("stone"), 1, 0));
        dict.register(TypeEntry::plain(Identifier::vanilla_static("dirt"), 3, 0));
        dict.freeze();
        dict
    }

    fn ruby() -> Identifier {
        "example:ruby".parse().unwrap()
    }

    #[test]
    fn append_keeps_existing_entries() {
        let mut dict = frozen_dictionary();
        dict.append_entry(10_000, ruby(), TypeEntry::plain(ruby(), 10_000, 1))
            .unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.from_string_id(&Identifier::vanilla_static("stone")), Some(1));
        assert_eq!(dict.from_int_id(10_000), Some(&ruby()));
        dict.check_shape().unwrap();
    }

    #[test]
    fn reappending_replaces_in_place() {
        let mut dict = frozen_dictionary();
        dict.append_entry(10_000, ruby(), TypeEntry::plain(ruby(), 10_000, 0))
            .unwrap();

        let mut metadata = NbtCompound::new();
        metadata.insert("marker", NbtTag::Int(2));
        let second = TypeEntry {
            metadata: Arc::new(metadata),
            ..TypeEntry::plain(ruby(), 10_000, 1)
        };
        dict.append_entry(10_000, ruby(), second.clone()).unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.entry(&ruby()), Some(&second));
        dict.check_shape().unwrap();
    }

    #[test]
    fn conflicting_ids_are_rejected() {
        let mut dict = frozen_dictionary();
        let err = dict
            .append_entry(1, ruby(), TypeEntry::plain(ruby(), 1, 0))
            .unwrap_err();
        assert!(matches!(err, PatchError::IdTaken { id: 1, .. }));

        let stone = Identifier::vanilla_static("stone");
        let err = dict
            .append_entry(7, stone.clone(), TypeEntry::plain(stone, 7, 0))
            .unwrap_err();
        assert!(matches!(err, PatchError::NameTaken { existing: 1, .. }));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn mismatched_entry_is_a_shape_error() {
        let mut dict = frozen_dictionary();
        let err = dict
            .append_entry(10_001, ruby(), TypeEntry::plain(ruby(), 10_000, 0))
            .unwrap_err();
        assert!(matches!(err, PatchError::Shape(_)));
    }

    #[test]
    fn shape_check_catches_foreign_layouts() {
        let dict = TypeDictionary::from_parts(
            SHAPE_VERSION + 1,
            FxHashMap::default(),
            FxHashMap::default(),
            Vec::new(),
        );
        assert!(matches!(dict.check_shape(), Err(PatchError::Shape(_))));

        let mut ids = FxHashMap::default();
        ids.insert(1, Identifier::vanilla_static("stone"));
        let dict = TypeDictionary::from_parts(SHAPE_VERSION, ids, FxHashMap::default(), Vec::new());
        assert!(matches!(dict.check_shape(), Err(PatchError::Shape(_))));
    }

    #[test]
    fn block_item_map_is_additive() {
        let mut map = BlockItemIdMap::new();
        let stone = Identifier::vanilla_static("stone");
        map.register(stone.clone(), stone.clone());
        map.freeze();

        map.append_mapping(ruby(), ruby()).unwrap();
        map.append_mapping(ruby(), ruby()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.block_for(&ruby()), Some(&ruby()));

        let err = map.append_mapping(ruby(), stone).unwrap_err();
        assert!(matches!(err, PatchError::BlockItemTaken { .. }));
    }
}
