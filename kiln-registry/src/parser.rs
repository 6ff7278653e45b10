//! String to item parser.

use std::sync::Arc;

use kiln_utils::Identifier;
use rustc_hash::FxHashMap;

use crate::{block::Block, item::Item};

/// A registered prototype, either an item or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Prototype {
    /// An item prototype.
    Item(Arc<Item>),
    /// A block prototype.
    Block(Arc<Block>),
}

impl Prototype {
    /// A fresh stack of this prototype. Blocks yield their block item.
    #[must_use]
    pub fn instantiate(&self, count: u32) -> Item {
        match self {
            Self::Item(item) => item.with_count(count),
            Self::Block(block) => block.as_item().with_count(count),
        }
    }

    /// Identifier of the prototype.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::Item(item) => &item.identifier,
            Self::Block(block) => &block.identifier,
        }
    }
}

impl From<Item> for Prototype {
    fn from(item: Item) -> Self {
        Self::Item(Arc::new(item))
    }
}

impl From<Block> for Prototype {
    fn from(block: Block) -> Self {
        Self::Block(Arc::new(block))
    }
}

/// Resolves identifiers typed by players or written in configs.
#[derive(Debug, Clone, Default)]
pub struct ItemParser {
    prototypes: FxHashMap<Identifier, Prototype>,
}

impl ItemParser {
    /// A parser that knows no identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or overrides the prototype for `identifier`.
    pub fn register(&mut self, identifier: Identifier, prototype: Prototype) {
        self.prototypes.insert(identifier, prototype);
    }

    /// The prototype registered for `identifier`.
    #[must_use]
    pub fn parse(&self, identifier: &Identifier) -> Option<&Prototype> {
        self.prototypes.get(identifier)
    }

    /// Parses and instantiates in one step.
    #[must_use]
    pub fn parse_item(&self, identifier: &Identifier, count: u32) -> Option<Item> {
        self.parse(identifier).map(|p| p.instantiate(count))
    }
}
