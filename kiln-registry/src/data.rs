//! Save data handlers: identifier to prototype and numeric id to identifier.

use std::sync::Arc;

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;

/// Serializer and deserializer tables for one kind of saved object.
///
/// Mapping an identifier that is already present overrides it.
#[derive(Debug, Clone)]
pub struct DataHandlers<T> {
    deserializers: FxHashMap<Identifier, Arc<T>>,
    serializers: FxHashMap<i32, Identifier>,
}

impl<T: Clone> DataHandlers<T> {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deserializers: FxHashMap::default(),
            serializers: FxHashMap::default(),
        }
    }

    /// Maps `identifier` to `prototype` in both directions.
    pub fn register(&mut self, identifier: Identifier, type_id: i32, prototype: impl Into<Arc<T>>) {
        self.serializers.insert(type_id, identifier.clone());
        self.deserializers.insert(identifier, prototype.into());
    }

    /// Builds a fresh value for a saved identifier.
    #[must_use]
    pub fn deserialize(&self, identifier: &Identifier) -> Option<T> {
        self.deserializers.get(identifier).map(|p| T::clone(p))
    }

    /// The identifier a value with `type_id` is saved under.
    #[must_use]
    pub fn serialize(&self, type_id: i32) -> Option<&Identifier> {
        self.serializers.get(&type_id)
    }

    /// Number of mapped identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deserializers.len()
    }

    /// Whether nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deserializers.is_empty()
    }
}

impl<T: Clone> Default for DataHandlers<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[test]
    fn remapping_overrides() {
        let id: Identifier = "example:ruby".parse().unwrap();
        let mut handlers: DataHandlers<Item> = DataHandlers::new();
        handlers.register(id.clone(), 10_000, Item::new(id.clone()).with_display_name("Ruby"));
        handlers.register(id.clone(), 10_000, Item::new(id.clone()).with_display_name("Gem"));

        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers.serialize(10_000), Some(&id));
        assert_eq!(
            handlers.deserialize(&id).map(|i| i.display_name),
            Some("Gem".to_owned())
        );
    }
}
