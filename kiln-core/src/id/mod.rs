//! Stable numeric ids for custom types and their on-disk cache.

mod allocator;
mod cache;

use std::fmt::{self, Display};

pub use allocator::{Allocation, IdAllocator, IdBases};
pub use cache::{CacheError, IdCache, IdCacheReader};

/// Allocation domain of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Block palette ids.
    Block,
    /// Item type ids.
    Item,
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "block",
            Self::Item => "item",
        })
    }
}
