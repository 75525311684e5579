//! Charms: standalone items granting skill points directly

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charm {
    pub name: String,
    /// Skill tree -> points (usually one or two entries)
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
}

impl Charm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skills: BTreeMap::new(),
        }
    }

    pub fn with_skill(mut self, skill_tree: impl Into<String>, points: i32) -> Self {
        self.skills.insert(skill_tree.into(), points);
        self
    }

    pub fn points_for(&self, skill_tree: &str) -> i32 {
        self.skills.get(skill_tree).copied().unwrap_or(0)
    }
}
