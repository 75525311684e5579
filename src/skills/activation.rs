//! Skill activation chart
//!
//! A skill tree activates a named skill once its accumulated points reach
//! `points_needed`. Negative thresholds describe penalty skills.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SearchError};
use crate::core::types::ClassType;

fn default_class() -> ClassType {
    ClassType::All
}

/// One activation row: `points_needed` points in `skill_tree` activate `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillActivationRequirement {
    pub skill_tree: String,
    pub name: String,
    pub points_needed: i32,
    #[serde(default = "default_class")]
    pub class_type: ClassType,
}

impl SkillActivationRequirement {
    pub fn new(skill_tree: impl Into<String>, name: impl Into<String>, points_needed: i32) -> Self {
        Self {
            skill_tree: skill_tree.into(),
            name: name.into(),
            points_needed,
            class_type: ClassType::All,
        }
    }

    pub fn for_class(mut self, class_type: ClassType) -> Self {
        self.class_type = class_type;
        self
    }
}

/// Activations applicable to one class, in chart order
#[derive(Debug, Clone)]
pub struct SkillActivationChart {
    class_type: ClassType,
    activations: Vec<SkillActivationRequirement>,
}

impl SkillActivationChart {
    /// Scope the full activation list to `class_type`
    ///
    /// A chart with no activation usable by the class means the data set is
    /// broken, not that nothing matched, so it is reported as an error.
    pub fn for_class(
        activations: &[SkillActivationRequirement],
        class_type: ClassType,
    ) -> Result<Self> {
        let scoped: Vec<SkillActivationRequirement> = activations
            .iter()
            .filter(|a| a.class_type.allows(class_type))
            .cloned()
            .collect();

        if scoped.is_empty() {
            return Err(SearchError::Configuration(format!(
                "skill activation chart has no entries for {:?}",
                class_type
            )));
        }

        Ok(Self {
            class_type,
            activations: scoped,
        })
    }

    pub fn class_type(&self) -> ClassType {
        self.class_type
    }

    /// Every activation with a positive threshold, i.e. the skills a hunter
    /// would ask for
    pub fn positive_skills(&self) -> Vec<&SkillActivationRequirement> {
        self.activations
            .iter()
            .filter(|a| a.points_needed > 0)
            .collect()
    }

    /// Look up an activation by its display name (case-insensitive)
    pub fn requirement(&self, name: &str) -> Option<&SkillActivationRequirement> {
        self.activations
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Name of the skill a tree activates at `points`, if any
    ///
    /// Positive totals pick the highest threshold reached; negative totals
    /// pick the most severe penalty reached.
    pub fn activated_name(&self, skill_tree: &str, points: i32) -> Option<&str> {
        let tree = self.activations.iter().filter(|a| a.skill_tree == skill_tree);
        if points > 0 {
            tree.filter(|a| a.points_needed > 0 && points >= a.points_needed)
                .max_by_key(|a| a.points_needed)
                .map(|a| a.name.as_str())
        } else if points < 0 {
            tree.filter(|a| a.points_needed < 0 && points <= a.points_needed)
                .min_by_key(|a| a.points_needed)
                .map(|a| a.name.as_str())
        } else {
            None
        }
    }
}
