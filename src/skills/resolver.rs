//! Requirement resolution
//!
//! Turns the caller's desired activations into the thresholds the search
//! actually has to reach for the active class.

use serde::Serialize;

use crate::core::types::ClassType;
use crate::skills::activation::SkillActivationRequirement;

/// A requirement the search must satisfy: at least `points_needed` points in
/// `skill_tree`. Always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSkill {
    pub skill_tree: String,
    pub name: String,
    pub points_needed: i32,
}

impl ResolvedSkill {
    /// Points still missing given `achieved` (0 when met)
    pub fn deficit(&self, achieved: i32) -> i32 {
        (self.points_needed - achieved).max(0)
    }

    pub fn is_met(&self, achieved: i32) -> bool {
        achieved >= self.points_needed
    }
}

/// Resolve desired activations for `class_type`
///
/// Drops entries with a non-positive threshold or a class scope that
/// excludes the active class. Two requirements on the same skill tree
/// collapse into the stricter one, kept where the tree first appeared.
/// Input order is otherwise preserved.
pub fn resolve_requirements(
    desired: &[SkillActivationRequirement],
    class_type: ClassType,
) -> Vec<ResolvedSkill> {
    let mut resolved: Vec<ResolvedSkill> = Vec::with_capacity(desired.len());

    for requirement in desired {
        if requirement.points_needed <= 0 || !requirement.class_type.allows(class_type) {
            continue;
        }

        match resolved
            .iter_mut()
            .find(|r| r.skill_tree == requirement.skill_tree)
        {
            Some(existing) => {
                if requirement.points_needed > existing.points_needed {
                    existing.points_needed = requirement.points_needed;
                    existing.name = requirement.name.clone();
                }
            }
            None => resolved.push(ResolvedSkill {
                skill_tree: requirement.skill_tree.clone(),
                name: requirement.name.clone(),
                points_needed: requirement.points_needed,
            }),
        }
    }

    resolved
}

/// An empty requirement list means there is nothing to search for
pub fn should_do_search(resolved: &[ResolvedSkill]) -> bool {
    !resolved.is_empty()
}
