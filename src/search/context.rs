//! Pipeline context passed from stage to stage
//!
//! `SearchContext` is the read-only part every stage needs. `PipelineState`
//! is the mutable part: the shared result sequence and the counters. Both
//! live for exactly one search invocation.

use serde::Serialize;

use crate::search::cache::ArmorSkillCache;
use crate::search::candidate::{GeneratedArmorSet, ResultSequence};
use crate::search::control::{ProgressReporter, SearchControl};
use crate::skills::ResolvedSkill;

/// Per-invocation limits (see `SearchConfig` for what each one means)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchLimits {
    pub unique_set_limit: usize,
    pub decoration_search_limit: usize,
    pub charm_lookup_breadth: usize,
    pub include_partial_matches: bool,
    pub parallel_threshold: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        crate::core::config::SearchConfig::default().limits()
    }
}

/// Counters collected while searching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub branches_pruned: u64,
    pub candidates_found: u64,
    pub complete_from_armor: u64,
    pub decoration_attempts: u64,
    pub decorated_sets: u64,
    pub complete_from_decorations: u64,
    pub charm_lookups: u64,
    pub complete_from_charm: u64,
    pub partial_sets: u64,
}

pub struct SearchContext<'c, 'a> {
    pub requirements: &'c [ResolvedSkill],
    pub cache: &'c ArmorSkillCache<'a>,
    pub limits: SearchLimits,
    pub weapon_slots: u8,
    pub control: &'c SearchControl,
    pub progress: &'c ProgressReporter<'c>,
}

impl SearchContext<'_, '_> {
    /// Cooperative checkpoint
    pub fn should_stop(&self) -> bool {
        self.control.is_stopped()
    }
}

#[derive(Debug)]
pub struct PipelineState<'a> {
    pub results: ResultSequence<'a>,
    pub stats: SearchStats,
}

impl<'a> PipelineState<'a> {
    pub fn new(ceiling: usize) -> Self {
        Self {
            results: ResultSequence::new(ceiling),
            stats: SearchStats::default(),
        }
    }

    /// Seal and append a finished set
    pub fn emit(&mut self, mut set: GeneratedArmorSet<'a>, requirements: &[ResolvedSkill]) -> bool {
        set.seal(requirements);
        self.results.push(set)
    }
}
