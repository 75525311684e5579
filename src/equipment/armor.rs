//! Armor pieces for the primary slots
//!
//! A piece carries skill points toward any number of skill trees and zero or
//! more decoration capacity groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{ArmorSlot, ClassType, Gender};

fn default_rarity() -> u8 {
    1
}

fn default_class() -> ClassType {
    ClassType::All
}

fn default_gender() -> Gender {
    Gender::Both
}

/// One wearable armor piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorPiece {
    pub name: String,
    pub slot: ArmorSlot,
    #[serde(default = "default_rarity")]
    pub rarity: u8,
    #[serde(default)]
    pub defense: u32,
    #[serde(default = "default_class")]
    pub class_type: ClassType,
    #[serde(default = "default_gender")]
    pub gender: Gender,
    /// Skill tree -> points
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    /// Capacity groups; a decoration must fit inside a single group
    #[serde(default)]
    pub decoration_slots: Vec<u8>,
}

impl ArmorPiece {
    pub fn new(name: impl Into<String>, slot: ArmorSlot) -> Self {
        Self {
            name: name.into(),
            slot,
            rarity: default_rarity(),
            defense: 0,
            class_type: ClassType::All,
            gender: Gender::Both,
            skills: BTreeMap::new(),
            decoration_slots: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill_tree: impl Into<String>, points: i32) -> Self {
        self.skills.insert(skill_tree.into(), points);
        self
    }

    pub fn with_slots(mut self, slots: &[u8]) -> Self {
        self.decoration_slots = slots.to_vec();
        self
    }

    pub fn with_rarity(mut self, rarity: u8) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_class(mut self, class_type: ClassType) -> Self {
        self.class_type = class_type;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Points this piece grants toward a skill tree (0 if none)
    pub fn points_for(&self, skill_tree: &str) -> i32 {
        self.skills.get(skill_tree).copied().unwrap_or(0)
    }

    /// Whether a hunter of this class and gender can wear the piece
    pub fn is_usable_by(&self, class_type: ClassType, gender: Gender) -> bool {
        self.class_type.allows(class_type) && self.gender.allows(gender)
    }

    /// Sum of all capacity groups
    pub fn total_capacity(&self) -> u32 {
        self.decoration_slots.iter().map(|&s| s as u32).sum()
    }
}
