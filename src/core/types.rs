//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Hunter class an activation or armor piece is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Blademaster,
    Gunner,
    /// Usable by every class
    All,
}

impl ClassType {
    /// Returns true if something scoped to `self` is usable by `active`
    pub fn allows(&self, active: ClassType) -> bool {
        *self == ClassType::All || *self == active
    }
}

impl std::str::FromStr for ClassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blademaster" | "blade" => Ok(ClassType::Blademaster),
            "gunner" | "gun" => Ok(ClassType::Gunner),
            "all" => Ok(ClassType::All),
            other => Err(format!("unknown class type: {}", other)),
        }
    }
}

/// Character gender; armor pieces may be `Both`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Both,
}

impl Gender {
    /// Returns true if a piece restricted to `self` can be worn by `active`
    pub fn allows(&self, active: Gender) -> bool {
        *self == Gender::Both || *self == active
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "both" => Ok(Gender::Both),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// Primary equipment slot
///
/// The declaration order is the order the base search assigns slots in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ArmorSlot {
    Head = 0,
    Body = 1,
    Arms = 2,
    Waist = 3,
    Legs = 4,
}

impl ArmorSlot {
    pub const COUNT: usize = 5;

    pub const ALL: [ArmorSlot; ArmorSlot::COUNT] = [
        ArmorSlot::Head,
        ArmorSlot::Body,
        ArmorSlot::Arms,
        ArmorSlot::Waist,
        ArmorSlot::Legs,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}
