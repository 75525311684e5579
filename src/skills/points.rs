//! Per-skill-tree point totals

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated points keyed by skill tree
///
/// Ordered so serialized output and iteration are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillPoints(BTreeMap<String, i32>);

impl SkillPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, skill_tree: &str) -> i32 {
        self.0.get(skill_tree).copied().unwrap_or(0)
    }

    pub fn add(&mut self, skill_tree: &str, points: i32) {
        if points == 0 {
            return;
        }
        match self.0.get_mut(skill_tree) {
            Some(total) => {
                *total += points;
                if *total == 0 {
                    self.0.remove(skill_tree);
                }
            }
            None => {
                self.0.insert(skill_tree.to_string(), points);
            }
        }
    }

    /// Add every (skill tree, points) pair of a contribution table
    pub fn add_all<'s>(&mut self, skills: impl IntoIterator<Item = (&'s String, &'s i32)>) {
        for (tree, points) in skills {
            self.add(tree, *points);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &i32)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
