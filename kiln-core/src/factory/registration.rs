use std::{fmt, sync::Arc};

use kiln_registry::{Block, Prototype};
use kiln_utils::Identifier;

use crate::item::CreativeInventoryInfo;

/// Builds the prototype for an identifier.
///
/// Called once per registration and again on every worker replay, so it
/// must return the same prototype each time.
pub type PrototypeBuilder = Arc<dyn Fn(&Identifier) -> Prototype + Send + Sync>;

/// A successful registration, kept so workers can replay it.
#[derive(Clone)]
pub enum Registration {
    /// A custom item.
    Item {
        /// Registered identifier.
        identifier: Identifier,
        /// Builds the item prototype.
        builder: PrototypeBuilder,
        /// Creative inventory placement, if any.
        creative: Option<CreativeInventoryInfo>,
    },
    /// A custom block, which brings its own block item.
    Block {
        /// Registered identifier.
        identifier: Identifier,
        /// Builds the block prototype.
        builder: PrototypeBuilder,
        /// Creative inventory placement, if any.
        creative: Option<CreativeInventoryInfo>,
    },
    /// An item placing an existing palette block.
    BlockItem {
        /// Item identifier.
        identifier: Identifier,
        /// The block it places.
        block: Arc<Block>,
    },
}

impl Registration {
    /// The registered identifier.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::Item { identifier, .. }
            | Self::Block { identifier, .. }
            | Self::BlockItem { identifier, .. } => identifier,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Item { .. } => "Item",
            Self::Block { .. } => "Block",
            Self::BlockItem { .. } => "BlockItem",
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind_name())
            .field("identifier", self.identifier())
            .finish_non_exhaustive()
    }
}
