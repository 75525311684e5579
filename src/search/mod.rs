//! The three-stage armor set search
//!
//! Control flows strictly forward: requirement resolution, skill cache,
//! base armor search, decoration search, charm search. A `SearchContext`
//! carries the read-only inputs between stages and a `PipelineState` carries
//! the shared result sequence.

pub mod armor_search;
pub mod cache;
pub mod candidate;
pub mod charm_search;
pub mod context;
pub mod control;
pub mod decoration_search;
pub mod searcher;

pub use cache::{ArmorSkillCache, CacheInputs, CachedPiece};
pub use candidate::{
    ArmorLoadout, CandidateSet, DecorationHost, GeneratedArmorSet, PlacedDecoration,
    ResultSequence, Shortfall,
};
pub use context::{PipelineState, SearchContext, SearchLimits, SearchStats};
pub use control::{NoProgress, ProgressReporter, ProgressSink, SearchControl, Stage};
pub use searcher::{SearchOutcome, SearchRequest, SetSearcher, MAX_WEAPON_SLOTS};
