//! Registration entry point for custom blocks and items.
//!
//! Every registration runs in the same order: validate, pick an id, build
//! the metadata tree, patch the host registries, then record the id and save
//! the cache. Anything that can be rejected is rejected before the host is
//! touched.

mod registration;

use std::sync::Arc;

use kiln_registry::{
    Block, CreativeCategory, CreativeGroup, CreativeInventory, HostRegistries, Item, Prototype,
    TypeEntry,
};
use kiln_utils::Identifier;
use rustc_hash::FxHashMap;

pub use registration::{PrototypeBuilder, Registration};

use crate::{
    error::RegistrationError,
    id::{Allocation, IdAllocator, IdBases, IdCache, IdCacheReader, TypeKind},
    item::CreativeInventoryInfo,
    metadata, patcher,
    worker::WorkerBootstrap,
};

/// Version of custom block palette entries.
const PALETTE_ENTRY_VERSION: i32 = 0;

/// Owns the custom type state of one context.
///
/// The main context creates one with [`CustomTypes::new`] and passes it by
/// reference to whatever registers content. Worker contexts get their own
/// through [`WorkerBootstrap`].
pub struct CustomTypes {
    allocator: IdAllocator,
    /// Write handle. Absent in worker contexts.
    cache: Option<IdCache>,
    reader: IdCacheReader,
    item_entries: Vec<TypeEntry>,
    block_entries: Vec<TypeEntry>,
    groups: FxHashMap<String, Arc<CreativeGroup>>,
    groups_loaded: bool,
    registrations: Vec<Registration>,
}

impl CustomTypes {
    /// Creates the main context's factory, seeding ids from `cache`.
    #[must_use]
    pub fn new(cache: IdCache, bases: IdBases) -> Self {
        let allocator = IdAllocator::with_cache(bases, cache.load());
        let reader = cache.reader();
        Self::with_allocator(allocator, Some(cache), reader)
    }

    /// A factory that only reproduces ids already in the cache.
    pub(crate) fn replay(reader: IdCacheReader) -> Self {
        let allocator = IdAllocator::replay(reader.load());
        Self::with_allocator(allocator, None, reader)
    }

    fn with_allocator(allocator: IdAllocator, cache: Option<IdCache>, reader: IdCacheReader) -> Self {
        Self {
            allocator,
            cache,
            reader,
            item_entries: Vec::new(),
            block_entries: Vec::new(),
            groups: FxHashMap::default(),
            groups_loaded: false,
            registrations: Vec::new(),
        }
    }

    /// Registers a custom item and returns its numeric id.
    ///
    /// `builder` must produce an item. Registering an identifier again keeps
    /// its id and replaces the previous prototype.
    pub fn register_item<F>(
        &mut self,
        host: &mut HostRegistries,
        builder: F,
        identifier: &str,
        creative: Option<CreativeInventoryInfo>,
    ) -> Result<i32, RegistrationError>
    where
        F: Fn(&Identifier) -> Prototype + Send + Sync + 'static,
    {
        let identifier: Identifier = identifier.parse()?;
        self.register_item_with(host, Arc::new(builder), identifier, creative)
    }

    /// Registers a custom block together with its block item and returns its numeric id.
    pub fn register_block<F>(
        &mut self,
        host: &mut HostRegistries,
        builder: F,
        identifier: &str,
        creative: Option<CreativeInventoryInfo>,
    ) -> Result<i32, RegistrationError>
    where
        F: Fn(&Identifier) -> Prototype + Send + Sync + 'static,
    {
        let identifier: Identifier = identifier.parse()?;
        self.register_block_with(host, Arc::new(builder), identifier, creative)
    }

    /// Registers `identifier` as the item that places `block`.
    ///
    /// The item takes the block's id, so `block` must already be in the palette.
    pub fn register_block_item(
        &mut self,
        host: &mut HostRegistries,
        identifier: &str,
        block: &Block,
    ) -> Result<(), RegistrationError> {
        let identifier: Identifier = identifier.parse()?;
        self.register_block_item_with(host, identifier, Arc::new(block.clone()))
    }

    fn register_item_with(
        &mut self,
        host: &mut HostRegistries,
        builder: PrototypeBuilder,
        identifier: Identifier,
        creative: Option<CreativeInventoryInfo>,
    ) -> Result<i32, RegistrationError> {
        let Prototype::Item(item) = builder(&identifier) else {
            return Err(RegistrationError::InvalidRegistration(format!(
                "builder for `{identifier}` produced a block, expected an item"
            )));
        };
        let category = creative
            .as_ref()
            .map(CreativeInventoryInfo::host_category)
            .transpose()?
            .flatten();
        let allocation = self.allocator.peek(&identifier, TypeKind::Item)?;
        let id = allocation.id;

        let mut item = Arc::unwrap_or_clone(item);
        item.identifier = identifier.clone();
        item.type_id = id;
        let component_based = item.is_component_based();
        let entry = TypeEntry {
            identifier: identifier.clone(),
            numeric_id: id,
            component_based,
            version: if component_based {
                TypeEntry::COMPONENT_ITEM_VERSION
            } else {
                TypeEntry::PLAIN_ITEM_VERSION
            },
            metadata: Arc::new(metadata::item_metadata(&item, id, creative.as_ref())?),
        };

        patcher::patch_item(host, entry.clone())?;
        self.allocator.commit(&identifier, TypeKind::Item, allocation);

        let item = Arc::new(item);
        host.item_data.register(identifier.clone(), id, Arc::clone(&item));
        host.items
            .register(identifier.clone(), Prototype::Item(Arc::clone(&item)));
        self.place_in_creative(host, &identifier, &item, creative.as_ref(), category);
        upsert_entry(&mut self.item_entries, entry);
        self.record(Registration::Item {
            identifier: identifier.clone(),
            builder,
            creative,
        });
        self.persist(allocation)?;

        log::info!("Registered custom item `{identifier}` with id {id}");
        Ok(id)
    }

    fn register_block_with(
        &mut self,
        host: &mut HostRegistries,
        builder: PrototypeBuilder,
        identifier: Identifier,
        creative: Option<CreativeInventoryInfo>,
    ) -> Result<i32, RegistrationError> {
        let Prototype::Block(block) = builder(&identifier) else {
            return Err(RegistrationError::InvalidRegistration(format!(
                "builder for `{identifier}` produced an item, expected a block"
            )));
        };
        let category = creative
            .as_ref()
            .map(CreativeInventoryInfo::host_category)
            .transpose()?
            .flatten();
        let allocation = self.allocator.peek(&identifier, TypeKind::Block)?;
        let id = allocation.id;

        let mut block = Arc::unwrap_or_clone(block);
        block.identifier = identifier.clone();
        block.type_id = id;
        let entry = TypeEntry {
            identifier: identifier.clone(),
            numeric_id: id,
            component_based: true,
            version: PALETTE_ENTRY_VERSION,
            metadata: Arc::new(metadata::block_metadata(&block, id, creative.as_ref())?),
        };

        patcher::patch_block(host, entry.clone())?;
        let block = Arc::new(block);
        self.link_block_item(host, &identifier, &block)?;
        self.allocator.commit(&identifier, TypeKind::Block, allocation);

        host.block_data
            .register(identifier.clone(), id, Arc::clone(&block));
        self.place_in_creative(host, &identifier, &block.as_item(), creative.as_ref(), category);
        upsert_entry(&mut self.block_entries, entry);
        self.record(Registration::Block {
            identifier: identifier.clone(),
            builder,
            creative,
        });
        self.persist(allocation)?;

        log::info!("Registered custom block `{identifier}` with id {id}");
        Ok(id)
    }

    fn register_block_item_with(
        &mut self,
        host: &mut HostRegistries,
        identifier: Identifier,
        block: Arc<Block>,
    ) -> Result<(), RegistrationError> {
        if host.block_palette.from_int_id(block.type_id) != Some(&block.identifier) {
            return Err(RegistrationError::InvalidRegistration(format!(
                "block `{}` ({}) is not in the block palette",
                block.identifier, block.type_id
            )));
        }
        let allocation = self
            .allocator
            .bind(&identifier, block.type_id, TypeKind::Block)?;

        self.link_block_item(host, &identifier, &block)?;
        self.allocator
            .commit(&identifier, TypeKind::Block, allocation);

        // A custom block already replays its own block item.
        let owned_by_block = self
            .registrations
            .iter()
            .any(|r| matches!(r, Registration::Block { identifier: i, .. } if i == &identifier));
        if !owned_by_block {
            self.record(Registration::BlockItem {
                identifier: identifier.clone(),
                block: Arc::clone(&block),
            });
        }
        self.persist(allocation)?;

        log::info!(
            "Registered block item `{identifier}` for block `{}` with id {}",
            block.identifier,
            block.type_id
        );
        Ok(())
    }

    fn link_block_item(
        &mut self,
        host: &mut HostRegistries,
        identifier: &Identifier,
        block: &Arc<Block>,
    ) -> Result<(), RegistrationError> {
        let entry = TypeEntry::plain(
            identifier.clone(),
            block.type_id,
            TypeEntry::BLOCK_ITEM_VERSION,
        );
        patcher::patch_block_item(host, &block.identifier, entry.clone())?;
        host.items
            .register(identifier.clone(), Prototype::Block(Arc::clone(block)));
        let mut item = block.as_item();
        item.identifier = identifier.clone();
        host.item_data.register(identifier.clone(), block.type_id, item);
        upsert_entry(&mut self.item_entries, entry);
        Ok(())
    }

    /// Returns a new stack of `amount` of a registered item.
    ///
    /// Every call builds a fresh value; changing it does not affect the
    /// registered prototype.
    pub fn get(
        &self,
        host: &HostRegistries,
        identifier: &str,
        amount: u32,
    ) -> Result<Item, RegistrationError> {
        let identifier: Identifier = identifier.parse()?;
        host.items
            .parse_item(&identifier, amount)
            .ok_or_else(|| RegistrationError::not_registered(&identifier))
    }

    /// Returns a new copy of a registered block.
    pub fn get_block(&self, host: &HostRegistries, identifier: &str) -> Result<Block, RegistrationError> {
        let identifier: Identifier = identifier.parse()?;
        host.block_data
            .deserialize(&identifier)
            .ok_or_else(|| RegistrationError::not_registered(&identifier))
    }

    /// Custom item type entries in registration order, including block items.
    #[must_use]
    pub fn item_table_entries(&self) -> &[TypeEntry] {
        &self.item_entries
    }

    /// Custom block palette entries in registration order.
    #[must_use]
    pub fn block_palette_entries(&self) -> &[TypeEntry] {
        &self.block_entries
    }

    /// Successful registrations, one per identifier, in first registration order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// The id allocator of this context.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Everything a worker needs to rebuild this context's custom types.
    #[must_use]
    pub fn worker_bootstrap(&self) -> WorkerBootstrap {
        WorkerBootstrap::new(self.reader.clone(), self.registrations.clone().into())
    }

    /// Runs a recorded registration again against `host`.
    pub(crate) fn replay_registration(
        &mut self,
        host: &mut HostRegistries,
        registration: &Registration,
    ) -> Result<(), RegistrationError> {
        match registration {
            Registration::Item {
                identifier,
                builder,
                creative,
            } => self
                .register_item_with(host, Arc::clone(builder), identifier.clone(), creative.clone())
                .map(|_| ()),
            Registration::Block {
                identifier,
                builder,
                creative,
            } => self
                .register_block_with(host, Arc::clone(builder), identifier.clone(), creative.clone())
                .map(|_| ()),
            Registration::BlockItem { identifier, block } => {
                self.register_block_item_with(host, identifier.clone(), Arc::clone(block))
            }
        }
    }

    fn place_in_creative(
        &mut self,
        host: &mut HostRegistries,
        identifier: &Identifier,
        item: &Item,
        info: Option<&CreativeInventoryInfo>,
        category: Option<CreativeCategory>,
    ) {
        let group = info.and_then(|info| self.resolve_group(&host.creative, info, item));
        host.creative.remove(identifier);
        if let Some(category) = category {
            host.creative.add(item.clone(), category, group);
        }
    }

    /// Finds the creative group named in `info`, creating it with `icon` if needed.
    fn resolve_group(
        &mut self,
        creative: &CreativeInventory,
        info: &CreativeInventoryInfo,
        icon: &Item,
    ) -> Option<Arc<CreativeGroup>> {
        let name = info.group_name()?;
        if !self.groups_loaded {
            for group in creative.all_entries().iter().filter_map(|e| e.group.as_ref()) {
                self.groups
                    .entry(group.name.clone())
                    .or_insert_with(|| Arc::clone(group));
            }
            self.groups_loaded = true;
        }
        let group = self
            .groups
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(CreativeGroup::new(name, icon.clone())));
        Some(Arc::clone(group))
    }

    fn record(&mut self, registration: Registration) {
        match self
            .registrations
            .iter_mut()
            .find(|r| r.identifier() == registration.identifier())
        {
            Some(slot) => *slot = registration,
            None => self.registrations.push(registration),
        }
    }

    fn persist(&self, allocation: Allocation) -> Result<(), RegistrationError> {
        if allocation.fresh
            && let Some(cache) = &self.cache
        {
            cache.save(self.allocator.mapping())?;
        }
        Ok(())
    }
}

fn upsert_entry(entries: &mut Vec<TypeEntry>, entry: TypeEntry) {
    match entries.iter_mut().find(|e| e.identifier == entry.identifier) {
        Some(slot) => *slot = entry,
        None => entries.push(entry),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use kiln_registry::{AppendEntry, Component, ComponentList};
    use simdnbt::owned::NbtCompound;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, CustomTypes, HostRegistries) {
        let dir = tempfile::tempdir().unwrap();
        let types = CustomTypes::new(IdCache::in_folder(dir.path()), IdBases::default());
        (dir, types, HostRegistries::vanilla())
    }

    fn ruby_block(identifier: &Identifier) -> Prototype {
        Block::new(identifier.clone(), "Ruby Block").into()
    }

    fn named_item(name: &'static str) -> impl Fn(&Identifier) -> Prototype + Send + Sync + 'static {
        move |identifier: &Identifier| -> Prototype {
            Item::new(identifier.clone()).with_display_name(name).into()
        }
    }

    #[test]
    fn ruby_block_is_cached_under_its_block_id() {
        let (dir, mut types, mut host) = setup();
        let id = types
            .register_block(&mut host, ruby_block, "example:ruby_block", None)
            .unwrap();
        assert_eq!(id, 5000);

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("idcache")).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "example:ruby_block": 5000 }));

        let identifier: Identifier = "example:ruby_block".parse().unwrap();
        let reloaded = IdCache::in_folder(dir.path()).load();
        assert_eq!(reloaded.get(&identifier), Some(&5000));

        let item_entry = host.item_types.entry(&identifier).unwrap();
        assert_eq!(item_entry.numeric_id, 5000);
        assert!(!item_entry.component_based);
        assert_eq!(item_entry.version, TypeEntry::BLOCK_ITEM_VERSION);
        assert_eq!(*item_entry.metadata, NbtCompound::new());
        assert_eq!(host.block_item_ids.block_for(&identifier), Some(&identifier));
        assert_eq!(types.block_palette_entries().len(), 1);
        assert_eq!(types.get_block(&host, "example:ruby_block").unwrap().type_id, 5000);
    }

    #[test]
    fn item_without_creative_info() {
        let (_dir, mut types, mut host) = setup();
        let builder = |identifier: &Identifier| -> Prototype {
            let components: ComponentList = [
                Component::MaxStackSize(64),
                Component::Durability {
                    max_durability: 100,
                },
            ]
            .into_iter()
            .collect();
            Item::new(identifier.clone()).with_components(components).into()
        };
        let id = types
            .register_item(&mut host, builder, "example:ruby_pickaxe", None)
            .unwrap();

        let entry = &types.item_table_entries()[0];
        assert_eq!(entry.numeric_id, id);
        assert!(entry.component_based);
        assert_eq!(entry.version, TypeEntry::COMPONENT_ITEM_VERSION);
        let components = entry.metadata.compound("components").unwrap();
        let properties = components.compound("item_properties").unwrap();
        assert!(properties.get("creative_category").is_none());
        assert!(properties.get("creative_group").is_none());
        assert_eq!(
            components
                .compound("minecraft:durability")
                .and_then(|d| d.int("max_durability")),
            Some(100)
        );
        assert!(!host.creative.contains(&entry.identifier));
    }

    #[test]
    fn reregistration_keeps_the_id_and_replaces_the_prototype() {
        let (_dir, mut types, mut host) = setup();
        let first = types
            .register_item(&mut host, named_item("Ruby"), "example:ruby", None)
            .unwrap();
        let second = types
            .register_item(&mut host, named_item("Polished Ruby"), "example:ruby", None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(types.item_table_entries().len(), 1);
        assert_eq!(types.registrations().len(), 1);
        assert_eq!(
            types.get(&host, "example:ruby", 1).unwrap().display_name,
            "Polished Ruby"
        );
        host.item_types.check_shape().unwrap();
    }

    #[test]
    fn get_returns_independent_instances() {
        let (_dir, mut types, mut host) = setup();
        types
            .register_item(&mut host, named_item("Ruby"), "example:ruby", None)
            .unwrap();

        let mut a = types.get(&host, "example:ruby", 3).unwrap();
        let b = types.get(&host, "example:ruby", 5).unwrap();
        a.display_name = "Changed".to_owned();
        a.count = 1;

        assert_eq!(b.count, 5);
        assert_eq!(b.display_name, "Ruby");
        assert_eq!(types.get(&host, "example:ruby", 1).unwrap().display_name, "Ruby");
        assert_eq!(b.type_id, 10_000);
    }

    #[test]
    fn get_of_unregistered_identifier_fails() {
        let (_dir, types, host) = setup();
        assert!(matches!(
            types.get(&host, "example:nothing", 1),
            Err(RegistrationError::InvalidRegistration(_))
        ));
        assert!(matches!(
            types.get(&host, "not an identifier", 1),
            Err(RegistrationError::InvalidRegistration(_))
        ));
    }

    #[test]
    fn wrong_prototype_kind_is_rejected_before_mutation() {
        let (dir, mut types, mut host) = setup();
        let items_before = host.item_types.len();
        let err = types
            .register_item(&mut host, ruby_block, "example:ruby_block", None)
            .unwrap_err();

        assert!(matches!(err, RegistrationError::InvalidRegistration(_)));
        assert_eq!(host.item_types.len(), items_before);
        assert!(types.allocator().is_empty());
        assert!(!dir.path().join("idcache").exists());
    }

    #[test]
    fn unknown_category_is_rejected_before_mutation() {
        let (dir, mut types, mut host) = setup();
        let err = types
            .register_item(
                &mut host,
                named_item("Ruby"),
                "example:ruby",
                Some(CreativeInventoryInfo::ungrouped("weapons")),
            )
            .unwrap_err();

        assert_eq!(err, RegistrationError::UnknownCategory("weapons".to_owned()));
        assert!(types.allocator().is_empty());
        assert!(types.item_table_entries().is_empty());
        assert!(!dir.path().join("idcache").exists());
    }

    #[test]
    fn metadata_failure_leaves_no_state() {
        let (_dir, mut types, mut host) = setup();
        let builder = |identifier: &Identifier| -> Prototype {
            let components: ComponentList = [Component::Fuel {
                duration: f32::INFINITY,
            }]
            .into_iter()
            .collect();
            Item::new(identifier.clone()).with_components(components).into()
        };
        let err = types
            .register_item(&mut host, builder, "example:bad_fuel", None)
            .unwrap_err();

        assert!(matches!(err, RegistrationError::MetadataBuild { .. }));
        assert!(types.allocator().is_empty());
        assert!(host.items.parse(&"example:bad_fuel".parse().unwrap()).is_none());
    }

    #[test]
    fn creative_groups_are_shared() {
        let (_dir, mut types, mut host) = setup();
        let swords = CreativeInventoryInfo::new(
            CreativeInventoryInfo::CATEGORY_EQUIPMENT,
            CreativeInventoryInfo::GROUP_SWORD,
        );
        let gems = CreativeInventoryInfo::new(CreativeInventoryInfo::CATEGORY_ITEMS, "itemGroup.name.gems");
        types
            .register_item(&mut host, named_item("Ruby Sword"), "example:ruby_sword", Some(swords))
            .unwrap();
        types
            .register_item(&mut host, named_item("Ruby"), "example:ruby", Some(gems.clone()))
            .unwrap();
        types
            .register_item(&mut host, named_item("Sapphire"), "example:sapphire", Some(gems))
            .unwrap();

        let group_of = |path: &str| {
            host.creative
                .all_entries()
                .iter()
                .find(|e| e.item.identifier.path == path)
                .and_then(|e| e.group.clone())
                .unwrap()
        };
        assert!(Arc::ptr_eq(&group_of("iron_sword"), &group_of("ruby_sword")));
        assert!(Arc::ptr_eq(&group_of("ruby"), &group_of("sapphire")));
        assert_eq!(group_of("sapphire").icon.identifier.path, "ruby");
    }

    #[test]
    fn hidden_categories_still_register() {
        let (_dir, mut types, mut host) = setup();
        let info = CreativeInventoryInfo::ungrouped(CreativeInventoryInfo::CATEGORY_COMMANDS);
        let id = types
            .register_item(&mut host, named_item("Wand"), "example:wand", Some(info))
            .unwrap();

        let identifier: Identifier = "example:wand".parse().unwrap();
        assert_eq!(host.item_types.from_string_id(&identifier), Some(id));
        assert!(!host.creative.contains(&identifier));
        // plain items carry no metadata, creative info included
        assert_eq!(*types.item_table_entries()[0].metadata, NbtCompound::new());
    }

    #[test]
    fn ids_survive_a_restart_in_any_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut first_run = CustomTypes::new(IdCache::in_folder(dir.path()), IdBases::default());
        let mut host = HostRegistries::vanilla();
        let a = first_run
            .register_item(&mut host, named_item("A"), "example:a", None)
            .unwrap();
        let b = first_run
            .register_item(&mut host, named_item("B"), "example:b", None)
            .unwrap();

        let mut second_run = CustomTypes::new(IdCache::in_folder(dir.path()), IdBases::default());
        let mut host = HostRegistries::vanilla();
        let c = second_run
            .register_item(&mut host, named_item("C"), "example:c", None)
            .unwrap();
        assert_eq!(
            second_run
                .register_item(&mut host, named_item("B"), "example:b", None)
                .unwrap(),
            b
        );
        assert_eq!(
            second_run
                .register_item(&mut host, named_item("A"), "example:a", None)
                .unwrap(),
            a
        );
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn block_item_needs_a_palette_block() {
        let (_dir, mut types, mut host) = setup();
        let mut loose = Block::new("example:loose".parse().unwrap(), "Loose");
        loose.type_id = 6000;
        let err = types
            .register_block_item(&mut host, "example:loose", &loose)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidRegistration(_)));

        types
            .register_block(&mut host, ruby_block, "example:ruby_block", None)
            .unwrap();
        let block = types.get_block(&host, "example:ruby_block").unwrap();
        types
            .register_block_item(&mut host, "example:ruby_block", &block)
            .unwrap();
        assert!(matches!(
            types.registrations(),
            [Registration::Block { .. }]
        ));
    }
}
