//! Item-side helpers: creative inventory placement and default components.

mod creative;
mod defaults;

pub use creative::CreativeInventoryInfo;
pub use defaults::init_components;
