//! Numeric id dictionaries shared with clients.
//!
//! A dictionary keeps three parallel tables: numeric id to identifier,
//! identifier to numeric id, and the ordered entry list that gets serialized.

use std::sync::Arc;

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;
use simdnbt::owned::NbtCompound;

use crate::RegistryExt;

/// Layout revision of [`TypeDictionary`]. Bumped whenever the table layout changes.
pub const SHAPE_VERSION: u32 = 1;

/// Full descriptor of one registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    /// Namespaced type name.
    pub identifier: Identifier,
    /// Numeric id sent to clients.
    pub numeric_id: i32,
    /// Whether clients should read `metadata` as component data.
    pub component_based: bool,
    /// Item version, one of the `*_VERSION` constants.
    pub version: i32,
    /// Client metadata tree. Shared because it is never mutated after registration.
    pub metadata: Arc<NbtCompound>,
}

impl TypeEntry {
    /// Version used by items without component data.
    pub const PLAIN_ITEM_VERSION: i32 = 0;
    /// Version used by component based items.
    pub const COMPONENT_ITEM_VERSION: i32 = 1;
    /// Version used by items that place a block.
    pub const BLOCK_ITEM_VERSION: i32 = 2;

    /// An entry without component data and with an empty metadata tree.
    #[must_use]
    pub fn plain(identifier: Identifier, numeric_id: i32, version: i32) -> Self {
        Self {
            identifier,
            numeric_id,
            component_based: false,
            version,
            metadata: Arc::new(NbtCompound::new()),
        }
    }
}

/// The host's id dictionary for one kind of type.
#[derive(Debug, Clone)]
pub struct TypeDictionary {
    pub(crate) shape_version: u32,
    pub(crate) int_to_string: FxHashMap<i32, Identifier>,
    pub(crate) string_to_int: FxHashMap<Identifier, i32>,
    pub(crate) entries: Vec<TypeEntry>,
    allows_registering: bool,
}

impl TypeDictionary {
    /// An empty, unfrozen dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shape_version: SHAPE_VERSION,
            int_to_string: FxHashMap::default(),
            string_to_int: FxHashMap::default(),
            entries: Vec::new(),
            allows_registering: true,
        }
    }

    /// Rebuilds a dictionary from raw tables without checking them.
    ///
    /// Used when the tables come from somewhere else, such as a host that was
    /// compiled against a different layout.
    #[must_use]
    pub fn from_parts(
        shape_version: u32,
        int_to_string: FxHashMap<i32, Identifier>,
        string_to_int: FxHashMap<Identifier, i32>,
        entries: Vec<TypeEntry>,
    ) -> Self {
        Self {
            shape_version,
            int_to_string,
            string_to_int,
            entries,
            allows_registering: false,
        }
    }

    /// Registers an entry during the initial loading phase.
    ///
    /// # Panics
    /// Panics if the dictionary has been frozen.
    pub fn register(&mut self, entry: TypeEntry) {
        assert!(
            self.allows_registering,
            "Cannot register type after registry is frozen"
        );
        self.int_to_string
            .insert(entry.numeric_id, entry.identifier.clone());
        self.string_to_int
            .insert(entry.identifier.clone(), entry.numeric_id);
        self.entries.push(entry);
    }

    /// The identifier registered under `id`.
    #[must_use]
    pub fn from_int_id(&self, id: i32) -> Option<&Identifier> {
        self.int_to_string.get(&id)
    }

    /// The id registered for `identifier`.
    #[must_use]
    pub fn from_string_id(&self, identifier: &Identifier) -> Option<i32> {
        self.string_to_int.get(identifier).copied()
    }

    /// Looks up the full entry for `identifier`.
    #[must_use]
    pub fn entry(&self, identifier: &Identifier) -> Option<&TypeEntry> {
        self.entries.iter().find(|e| &e.identifier == identifier)
    }

    /// Entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the loading phase is over.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        !self.allows_registering
    }
}

impl Default for TypeDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for TypeDictionary {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}
