//! Search configuration with documented constants
//!
//! Every tunable limit the pipeline honors is collected here, with the
//! defaults the desktop client ships with.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SearchError};
use crate::search::SearchLimits;

/// Configuration for a set search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    // === RESULT BUDGET ===
    /// Maximum number of generated sets returned by one search
    ///
    /// Shared by all three stages. The base search stops enumerating once
    /// this many candidates are either appended or waiting for later stages.
    pub unique_set_limit: usize,

    // === AUGMENTATION ===
    /// Maximum decoration evaluations per candidate set
    ///
    /// One evaluation is one decoration checked against one capacity group.
    /// Zero disables decorations entirely (and removes them from the base
    /// search bound).
    pub decoration_search_limit: usize,

    // === COMPLETION ===
    /// How many charms are inspected for the most deficient skill
    pub charm_lookup_breadth: usize,

    /// Whether sets still short of a requirement after the charm lookup are
    /// returned as partial matches
    pub include_partial_matches: bool,

    // === PARALLELIZATION ===
    /// Minimum inventory size before the skill cache is built in parallel
    ///
    /// Below this, rayon's scheduling overhead exceeds the scan itself.
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unique_set_limit: 200,
            decoration_search_limit: 50,
            charm_lookup_breadth: 50,
            include_partial_matches: true,
            parallel_threshold: 2000,
        }
    }
}

impl SearchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.unique_set_limit == 0 {
            return Err(SearchError::Configuration(
                "unique_set_limit must be at least 1".into(),
            ));
        }

        if self.parallel_threshold == 0 {
            return Err(SearchError::Configuration(
                "parallel_threshold must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Per-invocation limits derived from this config
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            unique_set_limit: self.unique_set_limit,
            decoration_search_limit: self.decoration_search_limit,
            charm_lookup_breadth: self.charm_lookup_breadth,
            include_partial_matches: self.include_partial_matches,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
