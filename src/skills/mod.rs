//! Skill activations, requirement resolution and point accounting

pub mod activation;
pub mod points;
pub mod resolver;

pub use activation::{SkillActivationChart, SkillActivationRequirement};
pub use points::SkillPoints;
pub use resolver::{resolve_requirements, should_do_search, ResolvedSkill};
