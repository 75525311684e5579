//! Decorations (jewels) slotted into armor or weapon capacity

use serde::{Deserialize, Serialize};

/// A decoration grants points to one skill tree and occupies `size` capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub name: String,
    pub skill_tree: String,
    pub points: i32,
    pub size: u8,
}

impl Decoration {
    pub fn new(name: impl Into<String>, skill_tree: impl Into<String>, points: i32, size: u8) -> Self {
        Self {
            name: name.into(),
            skill_tree: skill_tree.into(),
            points,
            size,
        }
    }

    /// Whether the decoration fits in `remaining` free capacity
    pub fn fits(&self, remaining: u8) -> bool {
        self.size > 0 && self.size <= remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits() {
        let jewel = Decoration::new("Attack Jewel", "Attack", 1, 1);
        assert!(jewel.fits(1));
        assert!(jewel.fits(3));
        assert!(!jewel.fits(0));

        let big = Decoration::new("Attack Jewel+", "Attack", 3, 3);
        assert!(!big.fits(2));
    }

    #[test]
    fn test_zero_size_never_fits() {
        let broken = Decoration::new("Dust", "Attack", 1, 0);
        assert!(!broken.fits(3));
    }
}
