//! Custom block and item registration for a Bedrock-protocol server.
//!
//! [`CustomTypes`] is the registration entry point. It hands out stable
//! numeric ids through [`id::IdAllocator`], persists them with
//! [`id::IdCache`], and writes into the host registries through
//! [`patcher`]. Worker threads rebuild the same state with
//! [`worker::WorkerBootstrap`].

pub mod error;
pub mod factory;
pub mod id;
pub mod item;
pub mod metadata;
pub mod patcher;
pub mod worker;

pub use error::RegistrationError;
pub use factory::{CustomTypes, Registration};
pub use item::CreativeInventoryInfo;
