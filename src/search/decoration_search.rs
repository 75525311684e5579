//! Decoration search
//!
//! Greedy, bounded fill of each candidate's capacity groups. Groups are
//! visited largest first; inside a group the most deficient skill gets the
//! highest-yield decoration that still fits, falling back to the next most
//! deficient skill when nothing fits. Each decoration checked against a
//! group counts as one attempt toward `decoration_search_limit`.

use crate::core::types::ArmorSlot;
use crate::search::candidate::{CandidateSet, DecorationHost, GeneratedArmorSet};
use crate::search::context::{PipelineState, SearchContext};
use crate::search::control::Stage;

/// One capacity group on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CapacityGroup {
    host: DecorationHost,
    group: usize,
    size: u8,
}

/// Decorate every pending candidate
///
/// Sets that end up meeting every requirement are appended; the rest, with
/// whatever decorations helped, are returned for the charm stage.
pub fn find_decorated_sets<'a>(
    ctx: &SearchContext<'_, 'a>,
    state: &mut PipelineState<'a>,
    candidates: Vec<CandidateSet<'a>>,
) -> Vec<GeneratedArmorSet<'a>> {
    let total = candidates.len();
    let mut pending = Vec::with_capacity(total);

    for (i, candidate) in candidates.into_iter().enumerate() {
        if ctx.should_stop() {
            break;
        }

        let groups = capacity_groups(&candidate, ctx.weapon_slots);
        let mut set = GeneratedArmorSet::from_candidate(candidate, ctx.weapon_slots);
        let attempts = decorate(ctx, &mut set, &groups);
        state.stats.decoration_attempts += attempts as u64;
        if !set.decorations.is_empty() {
            state.stats.decorated_sets += 1;
        }

        if set.is_complete(ctx.requirements) {
            state.emit(set, ctx.requirements);
            state.stats.complete_from_decorations += 1;
        } else {
            pending.push(set);
        }

        ctx.progress
            .stage(Stage::Decoration, (i + 1) as f32 / total as f32);
    }

    if !ctx.should_stop() {
        ctx.progress.stage(Stage::Decoration, 1.0);
    }

    tracing::debug!(
        pending = pending.len(),
        appended = state.results.len(),
        "Decoration search finished"
    );
    pending
}

/// Armor groups in slot order, then the weapon, sorted largest first
/// (stable, so equal sizes keep that order)
fn capacity_groups(candidate: &CandidateSet<'_>, weapon_slots: u8) -> Vec<CapacityGroup> {
    let mut groups = Vec::new();
    for slot in ArmorSlot::ALL {
        if let Some(piece) = candidate.armor[slot.index()] {
            for (group, &size) in piece.decoration_slots.iter().enumerate() {
                if size > 0 {
                    groups.push(CapacityGroup {
                        host: DecorationHost::Armor(slot),
                        group,
                        size,
                    });
                }
            }
        }
    }
    if weapon_slots > 0 {
        groups.push(CapacityGroup {
            host: DecorationHost::Weapon,
            group: 0,
            size: weapon_slots,
        });
    }
    groups.sort_by(|a, b| b.size.cmp(&a.size));
    groups
}

/// Requirement indices with a deficit, most deficient first (ties keep
/// requirement order)
fn deficit_order(deficits: &[i32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..deficits.len()).filter(|&r| deficits[r] > 0).collect();
    order.sort_by(|&a, &b| deficits[b].cmp(&deficits[a]));
    order
}

/// Fill `groups` on `set`; returns the number of attempts spent
fn decorate<'a>(
    ctx: &SearchContext<'_, 'a>,
    set: &mut GeneratedArmorSet<'a>,
    groups: &[CapacityGroup],
) -> usize {
    let limit = ctx.limits.decoration_search_limit;
    let mut attempts = 0;

    for group in groups {
        let mut remaining = group.size;

        while remaining > 0 {
            let order = deficit_order(&set.deficits(ctx.requirements));
            if order.is_empty() {
                return attempts;
            }

            let mut placed = None;
            'skills: for r in order {
                for &decoration in ctx.cache.decorations(r) {
                    if attempts >= limit {
                        return attempts;
                    }
                    attempts += 1;
                    if decoration.fits(remaining) {
                        placed = Some(decoration);
                        break 'skills;
                    }
                }
            }

            match placed {
                Some(decoration) => {
                    set.place_decoration(group.host, group.group, decoration);
                    remaining -= decoration.size;
                }
                // Nothing useful fits in what is left of this group.
                None => break,
            }
        }
    }

    attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ClassType, Gender};
    use crate::equipment::{ArmorPiece, Decoration};
    use crate::filter::FilterSet;
    use crate::search::cache::{ArmorSkillCache, CacheInputs};
    use crate::search::candidate::ArmorLoadout;
    use crate::search::context::SearchLimits;
    use crate::search::control::{NoProgress, ProgressReporter, SearchControl};
    use crate::skills::ResolvedSkill;

    fn req(tree: &str, points: i32) -> ResolvedSkill {
        ResolvedSkill {
            skill_tree: tree.into(),
            name: tree.into(),
            points_needed: points,
        }
    }

    fn decorate_one<'a>(
        armor: &'a [ArmorPiece],
        decorations: &'a [Decoration],
        requirements: &[ResolvedSkill],
        weapon_slots: u8,
        limit: usize,
    ) -> (Vec<GeneratedArmorSet<'a>>, PipelineState<'a>) {
        let filters = FilterSet::new();
        let cache = ArmorSkillCache::build(&CacheInputs {
            armor,
            decorations,
            charms: &[],
            requirements,
            class_type: ClassType::Gunner,
            gender: Gender::Female,
            filters: &filters,
            weapon_slots,
            parallel_threshold: 10_000,
        });
        let control = SearchControl::new();
        let sink = NoProgress;
        let reporter = ProgressReporter::new(&sink, &control);
        let limits = SearchLimits {
            decoration_search_limit: limit,
            ..Default::default()
        };
        let ctx = SearchContext {
            requirements,
            cache: &cache,
            limits,
            weapon_slots,
            control: &control,
            progress: &reporter,
        };

        let mut loadout: ArmorLoadout = [None; ArmorSlot::COUNT];
        for piece in armor {
            loadout[piece.slot.index()] = Some(piece);
        }
        let mut state = PipelineState::new(10);
        let pending =
            find_decorated_sets(&ctx, &mut state, vec![CandidateSet::from_loadout(loadout)]);
        (pending, state)
    }

    #[test]
    fn test_single_jewel_closes_gap_exactly() {
        let armor = vec![ArmorPiece::new("Helm", ArmorSlot::Head)
            .with_skill("A", 4)
            .with_slots(&[1])];
        let decorations = vec![Decoration::new("A Jewel", "A", 2, 1)];
        let (pending, state) = decorate_one(&armor, &decorations, &[req("A", 6)], 0, 50);

        assert!(pending.is_empty());
        assert_eq!(state.results.len(), 1);
        let set = &state.results.as_slice()[0];
        assert_eq!(set.skill_points.get("A"), 6);
        assert_eq!(set.decorations.len(), 1);
        assert_eq!(set.decorations[0].host, DecorationHost::Armor(ArmorSlot::Head));
        assert!(!set.is_partial());
    }

    #[test]
    fn test_largest_group_filled_first_with_best_jewel() {
        let armor = vec![
            ArmorPiece::new("Helm", ArmorSlot::Head)
                .with_skill("A", 1)
                .with_slots(&[1]),
            ArmorPiece::new("Mail", ArmorSlot::Body).with_slots(&[3]),
        ];
        let decorations = vec![
            Decoration::new("A Jewel", "A", 1, 1),
            Decoration::new("A Jewel+", "A", 4, 3),
        ];
        let (_, state) = decorate_one(&armor, &decorations, &[req("A", 5)], 0, 50);

        let set = &state.results.as_slice()[0];
        assert_eq!(set.decorations.len(), 1);
        assert_eq!(set.decorations[0].host, DecorationHost::Armor(ArmorSlot::Body));
        assert_eq!(set.decorations[0].decoration.name, "A Jewel+");
        assert_eq!(set.skill_points.get("A"), 5);
    }

    #[test]
    fn test_most_deficient_skill_served_first() {
        let armor = vec![ArmorPiece::new("Helm", ArmorSlot::Head).with_slots(&[1])];
        let decorations = vec![
            Decoration::new("A Jewel", "A", 1, 1),
            Decoration::new("B Jewel", "B", 1, 1),
        ];
        let reqs = vec![req("A", 2), req("B", 5)];
        let (pending, _) = decorate_one(&armor, &decorations, &reqs, 0, 50);

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].decorations[0].decoration.name, "B Jewel");
        assert_eq!(pending[0].skill_points.get("B"), 1);
    }

    #[test]
    fn test_weapon_slots_used() {
        let armor = vec![ArmorPiece::new("Helm", ArmorSlot::Head).with_skill("A", 4)];
        let decorations = vec![Decoration::new("A Jewel", "A", 1, 1)];
        let (pending, state) = decorate_one(&armor, &decorations, &[req("A", 6)], 2, 50);

        assert!(pending.is_empty());
        let set = &state.results.as_slice()[0];
        assert_eq!(set.decorations.len(), 2);
        assert!(set.decorations.iter().all(|d| d.host == DecorationHost::Weapon));
    }

    #[test]
    fn test_attempt_limit_bounds_work() {
        let armor = vec![ArmorPiece::new("Helm", ArmorSlot::Head)
            .with_skill("A", 4)
            .with_slots(&[3])];
        let decorations = vec![Decoration::new("A Jewel", "A", 1, 1)];
        let (pending, state) = decorate_one(&armor, &decorations, &[req("A", 7)], 0, 2);

        assert_eq!(state.stats.decoration_attempts, 2);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].skill_points.get("A"), 6);
    }

    #[test]
    fn test_nothing_fits_passes_set_through() {
        let armor = vec![ArmorPiece::new("Helm", ArmorSlot::Head)
            .with_skill("A", 4)
            .with_slots(&[1])];
        let decorations = vec![Decoration::new("A Jewel+", "A", 3, 3)];
        let (pending, state) = decorate_one(&armor, &decorations, &[req("A", 6)], 0, 50);

        assert!(state.results.is_empty());
        assert_eq!(pending.len(), 1);
        assert!(pending[0].decorations.is_empty());
        assert_eq!(pending[0].skill_points.get("A"), 4);
    }

    #[test]
    fn test_deficit_order() {
        assert_eq!(deficit_order(&[2, 0, 5, 2]), vec![2, 0, 3]);
        assert!(deficit_order(&[0, 0]).is_empty());
    }
}
