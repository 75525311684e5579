//! Armor Set Search - finds armor, decorations and charms that activate a
//! requested list of skills

pub mod core;
pub mod data;
pub mod equipment;
pub mod filter;
pub mod search;
pub mod skills;

pub use crate::core::{Result, SearchConfig, SearchError};
pub use crate::data::{load_catalog, Catalog};
pub use crate::search::{SearchControl, SearchOutcome, SearchRequest, SetSearcher};
pub use crate::skills::SkillActivationRequirement;
