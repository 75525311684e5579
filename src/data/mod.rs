//! Catalog data: the inventory, decorations, charms and activation chart the
//! search reads from

mod catalog;
mod loader;

pub use catalog::Catalog;
pub use loader::load_catalog;
