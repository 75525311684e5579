//! Set searcher: runs the three-stage pipeline over a catalog
//!
//! 1. Resolve the desired activations for the active class
//! 2. Build the armor skill cache (filters, class, gender applied once)
//! 3. Base armor search
//! 4. Decoration search on the sets still short of a requirement
//! 5. Charm search on whatever is still short after that
//!
//! Every call builds a fresh cache and result sequence; nothing is shared
//! between invocations except the caller's `SearchControl`.

use serde::Serialize;
use std::time::Instant;

use crate::core::error::{Result, SearchError};
use crate::core::types::{ClassType, Gender};
use crate::data::Catalog;
use crate::filter::FilterSet;
use crate::search::armor_search::find_armor_sets;
use crate::search::cache::{ArmorSkillCache, CacheInputs};
use crate::search::candidate::GeneratedArmorSet;
use crate::search::charm_search::find_charm_sets;
use crate::search::context::{PipelineState, SearchContext, SearchLimits, SearchStats};
use crate::search::control::{ProgressReporter, ProgressSink, SearchControl};
use crate::search::decoration_search::find_decorated_sets;
use crate::skills::{
    resolve_requirements, should_do_search, ResolvedSkill, SkillActivationChart,
    SkillActivationRequirement,
};

/// Weapons never carry more than three decoration slots
pub const MAX_WEAPON_SLOTS: u8 = 3;

/// What to search for
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub desired_skills: Vec<SkillActivationRequirement>,
    pub class_type: ClassType,
    pub gender: Gender,
    pub filters: FilterSet,
    pub limits: SearchLimits,
    pub weapon_slots: u8,
}

impl SearchRequest {
    pub fn new(class_type: ClassType, gender: Gender) -> Self {
        Self {
            desired_skills: Vec::new(),
            class_type,
            gender,
            filters: FilterSet::new(),
            limits: SearchLimits::default(),
            weapon_slots: 0,
        }
    }

    pub fn with_skill(mut self, skill: SkillActivationRequirement) -> Self {
        self.desired_skills.push(skill);
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_weapon_slots(mut self, weapon_slots: u8) -> Self {
        self.weapon_slots = weapon_slots;
        self
    }
}

/// Result of one search
#[derive(Debug, Serialize)]
pub struct SearchOutcome<'a> {
    /// The result sequence, in the order sets were appended
    pub sets: Vec<GeneratedArmorSet<'a>>,
    pub requirements: Vec<ResolvedSkill>,
    pub stats: SearchStats,
    /// True when the caller stopped the search before it finished
    pub stopped: bool,
}

impl<'a> SearchOutcome<'a> {
    fn empty(requirements: Vec<ResolvedSkill>, stopped: bool) -> Self {
        Self {
            sets: Vec::new(),
            requirements,
            stats: SearchStats::default(),
            stopped,
        }
    }

    pub fn complete_sets(&self) -> impl Iterator<Item = &GeneratedArmorSet<'a>> {
        self.sets.iter().filter(|s| !s.is_partial())
    }
}

/// Runs searches against a borrowed catalog
pub struct SetSearcher<'a> {
    catalog: &'a Catalog,
}

impl<'a> SetSearcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Activation chart scoped to `class_type`
    ///
    /// `All` only scopes catalog entries; a hunter is always one class.
    pub fn chart(&self, class_type: ClassType) -> Result<SkillActivationChart> {
        if class_type == ClassType::All {
            return Err(SearchError::Configuration(
                "active class must be Blademaster or Gunner".into(),
            ));
        }
        SkillActivationChart::for_class(&self.catalog.activations, class_type)
    }

    /// Activations a hunter of `class_type` could ask for
    pub fn positive_skills(&self, class_type: ClassType) -> Result<Vec<SkillActivationRequirement>> {
        Ok(self
            .chart(class_type)?
            .positive_skills()
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn search(
        &self,
        request: &SearchRequest,
        control: &SearchControl,
        progress: &dyn ProgressSink,
    ) -> Result<SearchOutcome<'a>> {
        if request.weapon_slots > MAX_WEAPON_SLOTS {
            return Err(SearchError::Configuration(format!(
                "weapon_slots must be at most {}, got {}",
                MAX_WEAPON_SLOTS, request.weapon_slots
            )));
        }

        let chart = self.chart(request.class_type)?;
        let requirements = resolve_requirements(&request.desired_skills, chart.class_type());
        if !should_do_search(&requirements) || request.limits.unique_set_limit == 0 {
            tracing::info!("Nothing to search for");
            return Ok(SearchOutcome::empty(requirements, false));
        }
        if control.is_stopped() {
            return Ok(SearchOutcome::empty(requirements, true));
        }

        let reporter = ProgressReporter::new(progress, control);
        let mut clock = Instant::now();

        tracing::info!(
            requirements = requirements.len(),
            inventory = self.catalog.armor.len(),
            "Filtering equipment"
        );
        let cache = ArmorSkillCache::build(&CacheInputs {
            armor: &self.catalog.armor,
            decorations: &self.catalog.decorations,
            charms: &self.catalog.charms,
            requirements: &requirements,
            class_type: request.class_type,
            gender: request.gender,
            filters: &request.filters,
            weapon_slots: request.weapon_slots,
            parallel_threshold: request.limits.parallel_threshold,
        });
        tracing::info!(
            eligible = cache.eligible_pieces(),
            elapsed_ms = lap(&mut clock),
            "Finished filtering"
        );

        if cache.is_empty() {
            tracing::info!("No eligible armor contributes to the requested skills");
            return Ok(SearchOutcome::empty(requirements, control.is_stopped()));
        }

        let ctx = SearchContext {
            requirements: &requirements,
            cache: &cache,
            limits: request.limits,
            weapon_slots: request.weapon_slots,
            control,
            progress: &reporter,
        };
        let mut state = PipelineState::new(request.limits.unique_set_limit);

        tracing::info!("Starting armor search");
        let candidates = find_armor_sets(&ctx, &mut state);
        tracing::info!(elapsed_ms = lap(&mut clock), "Finished armor search");

        tracing::info!("Starting decoration search");
        let decorated = find_decorated_sets(&ctx, &mut state, candidates);
        tracing::info!(elapsed_ms = lap(&mut clock), "Finished decoration search");

        tracing::info!("Starting charm search");
        find_charm_sets(&ctx, &mut state, decorated);
        tracing::info!(elapsed_ms = lap(&mut clock), "Finished charm search");

        let stopped = control.is_stopped();
        if stopped {
            tracing::info!(collected = state.results.len(), "Search stopped by caller");
        } else {
            reporter.finish();
        }
        tracing::debug!(stats = ?state.stats, "Search statistics");

        let PipelineState { results, stats } = state;
        Ok(SearchOutcome {
            sets: results.into_vec(),
            requirements,
            stats,
            stopped,
        })
    }
}

/// Milliseconds since `clock`, resetting it
fn lap(clock: &mut Instant) -> u128 {
    let elapsed = clock.elapsed().as_millis();
    *clock = Instant::now();
    elapsed
}
