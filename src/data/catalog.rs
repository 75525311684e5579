//! In-memory catalog handed to the searcher

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SearchError};
use crate::equipment::{ArmorPiece, Charm, Decoration};
use crate::skills::SkillActivationRequirement;

/// Everything the search reads; owned here and only borrowed by the search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "armor")]
    pub armor: Vec<ArmorPiece>,
    #[serde(default, rename = "decoration")]
    pub decorations: Vec<Decoration>,
    #[serde(default, rename = "charm")]
    pub charms: Vec<Charm>,
    #[serde(default, rename = "activation")]
    pub activations: Vec<SkillActivationRequirement>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a catalog from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject data the search cannot interpret
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for decoration in &self.decorations {
            if decoration.size == 0 {
                errors.push(format!("decoration '{}' has size 0", decoration.name));
            }
        }
        for activation in &self.activations {
            if activation.skill_tree.is_empty() {
                errors.push(format!("activation '{}' has no skill tree", activation.name));
            }
        }
        for piece in &self.armor {
            if piece.skills.values().any(|&p| p < 0) {
                tracing::debug!(piece = %piece.name, "Armor piece carries negative skill points");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SearchError::Configuration(errors.join(", ")))
        }
    }
}
