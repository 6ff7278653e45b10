//! Identifier to numeric id allocation.

use std::collections::hash_map::Entry;

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;

use super::TypeKind;
use crate::error::RegistrationError;

/// Where fresh ids start for each kind.
///
/// Both must sit above the highest vanilla id. Ids taken by another
/// identifier are skipped, so the two ranges may meet without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdBases {
    /// First candidate id for blocks.
    pub block: i32,
    /// First candidate id for items.
    pub item: i32,
}

impl IdBases {
    /// First id handed to a custom block.
    pub const FIRST_CUSTOM_BLOCK_ID: i32 = 5000;
    /// First id handed to a custom item.
    pub const FIRST_CUSTOM_ITEM_ID: i32 = 10_000;
}

impl Default for IdBases {
    fn default() -> Self {
        Self {
            block: Self::FIRST_CUSTOM_BLOCK_ID,
            item: Self::FIRST_CUSTOM_ITEM_ID,
        }
    }
}

/// Result of [`IdAllocator::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// The allocated numeric id.
    pub id: i32,
    /// True when the id was minted by this call and has not been persisted yet.
    pub fresh: bool,
}

/// Hands out numeric ids that stay the same across restarts.
///
/// Every identifier keeps the id it was first given, whether that happened
/// in this process or in an earlier one whose mapping was loaded from the
/// cache. Identifiers and ids form a bijection.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    ids: FxHashMap<Identifier, i32>,
    owners: FxHashMap<i32, Identifier>,
    /// Kinds requested in this process. Cached entries carry no kind.
    kinds: FxHashMap<Identifier, TypeKind>,
    next_block_id: i32,
    next_item_id: i32,
    replay: bool,
}

impl IdAllocator {
    /// An allocator with nothing cached.
    #[must_use]
    pub fn new(bases: IdBases) -> Self {
        Self {
            ids: FxHashMap::default(),
            owners: FxHashMap::default(),
            kinds: FxHashMap::default(),
            next_block_id: bases.block,
            next_item_id: bases.item,
            replay: false,
        }
    }

    /// An allocator seeded with a mapping loaded from the cache.
    ///
    /// If two cached identifiers claim the same id, the first one in
    /// identifier order keeps it and the other is dropped and reallocated on
    /// its next registration.
    #[must_use]
    pub fn with_cache(bases: IdBases, cached: FxHashMap<Identifier, i32>) -> Self {
        let mut allocator = Self::new(bases);
        let mut cached: Vec<_> = cached.into_iter().collect();
        cached.sort_unstable();
        for (identifier, id) in cached {
            match allocator.owners.entry(id) {
                Entry::Occupied(owner) => {
                    log::warn!(
                        "Id cache maps both `{}` and `{identifier}` to {id}, dropping `{identifier}`",
                        owner.get()
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(identifier.clone());
                    allocator.ids.insert(identifier, id);
                }
            }
        }
        allocator
    }

    /// A read-only allocator for worker replay. It only returns cached ids.
    #[must_use]
    pub fn replay(cached: FxHashMap<Identifier, i32>) -> Self {
        let mut allocator = Self::with_cache(IdBases::default(), cached);
        allocator.replay = true;
        allocator
    }

    /// Returns the id for `identifier`, minting one if it has none yet.
    ///
    /// Asking again for the same identifier and kind returns the same id.
    pub fn allocate(
        &mut self,
        identifier: &Identifier,
        kind: TypeKind,
    ) -> Result<Allocation, RegistrationError> {
        let allocation = self.peek(identifier, kind)?;
        self.commit(identifier, kind, allocation);
        Ok(allocation)
    }

    /// What [`IdAllocator::allocate`] would return, without recording it.
    pub fn peek(
        &self,
        identifier: &Identifier,
        kind: TypeKind,
    ) -> Result<Allocation, RegistrationError> {
        if let Some(&existing) = self.kinds.get(identifier)
            && existing != kind
        {
            return Err(RegistrationError::kind_conflict(identifier, existing, kind));
        }
        match self.ids.get(identifier) {
            Some(&id) => Ok(Allocation { id, fresh: false }),
            None if self.replay => Err(RegistrationError::UncachedIdentifier(identifier.clone())),
            None => Ok(Allocation {
                id: self.next_free_id(kind),
                fresh: true,
            }),
        }
    }

    /// Binds `identifier` to an id chosen by someone else, such as the id of
    /// the block an item places.
    pub fn bind(
        &self,
        identifier: &Identifier,
        id: i32,
        kind: TypeKind,
    ) -> Result<Allocation, RegistrationError> {
        if let Some(&existing) = self.kinds.get(identifier)
            && existing != kind
        {
            return Err(RegistrationError::kind_conflict(identifier, existing, kind));
        }
        match (self.ids.get(identifier), self.owners.get(&id)) {
            (Some(&bound), _) if bound == id => Ok(Allocation { id, fresh: false }),
            (Some(&bound), _) => Err(RegistrationError::DuplicateRegistration(format!(
                "`{identifier}` already has id {bound}, cannot bind it to {id}"
            ))),
            (None, Some(owner)) => Err(RegistrationError::DuplicateRegistration(format!(
                "id {id} already belongs to `{owner}`, cannot bind `{identifier}`"
            ))),
            (None, None) => Ok(Allocation { id, fresh: true }),
        }
    }

    /// Records an allocation returned by [`IdAllocator::peek`] or [`IdAllocator::bind`].
    pub(crate) fn commit(&mut self, identifier: &Identifier, kind: TypeKind, allocation: Allocation) {
        if allocation.fresh {
            let id = allocation.id;
            self.ids.insert(identifier.clone(), id);
            self.owners.insert(id, identifier.clone());
            let next = match kind {
                TypeKind::Block => &mut self.next_block_id,
                TypeKind::Item => &mut self.next_item_id,
            };
            if id >= *next {
                *next = id + 1;
            }
            log::debug!("Allocated {kind} id {id} for `{identifier}`");
        }
        self.kinds.insert(identifier.clone(), kind);
    }

    fn next_free_id(&self, kind: TypeKind) -> i32 {
        let mut next = match kind {
            TypeKind::Block => self.next_block_id,
            TypeKind::Item => self.next_item_id,
        };
        while self.owners.contains_key(&next) {
            next += 1;
        }
        next
    }

    /// The id bound to `identifier`, cached or allocated.
    #[must_use]
    pub fn get(&self, identifier: &Identifier) -> Option<i32> {
        self.ids.get(identifier).copied()
    }

    /// The identifier that owns `id`.
    #[must_use]
    pub fn identifier_of(&self, id: i32) -> Option<&Identifier> {
        self.owners.get(&id)
    }

    /// Kind requested for `identifier` in this process, if any.
    #[must_use]
    pub fn kind_of(&self, identifier: &Identifier) -> Option<TypeKind> {
        self.kinds.get(identifier).copied()
    }

    /// Every known identifier and its id, including cached ones not used in this process.
    #[must_use]
    pub fn mapping(&self) -> &FxHashMap<Identifier, i32> {
        &self.ids
    }

    /// Whether this allocator only reproduces cached ids.
    #[must_use]
    pub fn is_replay(&self) -> bool {
        self.replay
    }

    /// Number of bound identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no identifier is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(IdBases::default())
    }
}
