//! Equipment the search combines: armor pieces, decorations and charms

pub mod armor;
pub mod charm;
pub mod decoration;

pub use armor::ArmorPiece;
pub use charm::Charm;
pub use decoration::Decoration;
