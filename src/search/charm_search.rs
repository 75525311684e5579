//! Charm search
//!
//! Lookup-and-verify: for each decorated set still short of a requirement,
//! walk the charms for its most deficient skill (best first, at most
//! `charm_lookup_breadth` of them) and take the first one that closes every
//! deficit. Failing that, the charm that shrinks the total shortfall the most
//! is attached and the set is kept as a partial match. Sets that were
//! decorated are always kept; `include_partial_matches` only governs sets
//! neither earlier stage could improve.

use crate::equipment::Charm;
use crate::search::candidate::GeneratedArmorSet;
use crate::search::context::{PipelineState, SearchContext};
use crate::search::control::Stage;
use crate::skills::ResolvedSkill;

pub fn find_charm_sets<'a>(
    ctx: &SearchContext<'_, 'a>,
    state: &mut PipelineState<'a>,
    sets: Vec<GeneratedArmorSet<'a>>,
) {
    let total = sets.len();

    for (i, mut set) in sets.into_iter().enumerate() {
        if ctx.should_stop() {
            break;
        }

        match find_charm(ctx, state, &set) {
            CharmMatch::Complete(charm) => {
                set.attach_charm(charm);
                state.emit(set, ctx.requirements);
                state.stats.complete_from_charm += 1;
            }
            CharmMatch::Partial(best) => {
                if let Some(charm) = best {
                    set.attach_charm(charm);
                }
                if ctx.limits.include_partial_matches || !set.decorations.is_empty() {
                    state.emit(set, ctx.requirements);
                    state.stats.partial_sets += 1;
                }
            }
        }

        ctx.progress.stage(Stage::Charm, (i + 1) as f32 / total as f32);
    }

    tracing::debug!(appended = state.results.len(), "Charm search finished");
}

enum CharmMatch<'a> {
    Complete(&'a Charm),
    /// Best improving charm, if any
    Partial(Option<&'a Charm>),
}

fn total_shortfall(set: &GeneratedArmorSet<'_>, charm: Option<&Charm>, requirements: &[ResolvedSkill]) -> i32 {
    requirements
        .iter()
        .map(|r| {
            let bonus = charm.map_or(0, |c| c.points_for(&r.skill_tree));
            r.deficit(set.skill_points.get(&r.skill_tree) + bonus)
        })
        .sum()
}

fn find_charm<'a>(
    ctx: &SearchContext<'_, 'a>,
    state: &mut PipelineState<'a>,
    set: &GeneratedArmorSet<'a>,
) -> CharmMatch<'a> {
    let deficits = set.deficits(ctx.requirements);
    let most_deficient = deficits
        .iter()
        .enumerate()
        .filter(|(_, &d)| d > 0)
        // max_by_key keeps the last maximum; reverse so the first one wins.
        .rev()
        .max_by_key(|(_, &d)| d)
        .map(|(r, _)| r);

    let Some(r) = most_deficient else {
        return CharmMatch::Partial(None);
    };

    let mut best: Option<(&'a Charm, i32)> = None;
    let baseline = total_shortfall(set, None, ctx.requirements);

    for &charm in ctx.cache.charms(r).iter().take(ctx.limits.charm_lookup_breadth) {
        state.stats.charm_lookups += 1;
        let shortfall = total_shortfall(set, Some(charm), ctx.requirements);
        if shortfall == 0 {
            return CharmMatch::Complete(charm);
        }
        if shortfall < baseline && best.map_or(true, |(_, s)| shortfall < s) {
            best = Some((charm, shortfall));
        }
    }

    CharmMatch::Partial(best.map(|(charm, _)| charm))
}
