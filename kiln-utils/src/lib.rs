//! Small shared types used across the kiln crates.

mod identifier;

pub use identifier::{Identifier, IdentifierError};
