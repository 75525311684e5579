//! Armor skill cache
//!
//! Built once per search from the full inventory. For every resolved skill it
//! holds, per slot, the eligible pieces that contribute to that skill, plus
//! the decorations and charms that do. Later stages never rescan the
//! inventory.

use rayon::prelude::*;

use crate::core::types::{ArmorSlot, ClassType, Gender};
use crate::equipment::{ArmorPiece, Charm, Decoration};
use crate::filter::FilterSet;
use crate::skills::ResolvedSkill;

/// A piece plus its position in the inventory (the tie-break order)
#[derive(Debug, Clone, Copy)]
pub struct CachedPiece<'a> {
    pub index: usize,
    pub piece: &'a ArmorPiece,
}

/// Everything the cache is derived from
pub struct CacheInputs<'a, 'r> {
    pub armor: &'a [ArmorPiece],
    pub decorations: &'a [Decoration],
    pub charms: &'a [Charm],
    pub requirements: &'r [ResolvedSkill],
    pub class_type: ClassType,
    pub gender: Gender,
    pub filters: &'r FilterSet,
    pub weapon_slots: u8,
    pub parallel_threshold: usize,
}

/// Index for one skill tree
#[derive(Debug, Default)]
struct SkillIndex<'a> {
    by_slot: [Vec<CachedPiece<'a>>; ArmorSlot::COUNT],
    best_by_slot: [i32; ArmorSlot::COUNT],
    decorations: Vec<&'a Decoration>,
    charms: Vec<&'a Charm>,
    /// best_fill[c]: most points reachable with `c` free capacity
    best_fill: Vec<i32>,
    best_charm: i32,
}

#[derive(Debug)]
pub struct ArmorSkillCache<'a> {
    skills: Vec<SkillIndex<'a>>,
    max_capacity_by_slot: [u32; ArmorSlot::COUNT],
    weapon_slots: u8,
    eligible_pieces: usize,
}

impl<'a> ArmorSkillCache<'a> {
    pub fn build(inputs: &CacheInputs<'a, '_>) -> Self {
        let armor = inputs.armor;
        let parallel = armor.len() >= inputs.parallel_threshold;

        // The composed filter runs exactly once per piece.
        let is_eligible = |piece: &ArmorPiece| {
            piece.is_usable_by(inputs.class_type, inputs.gender) && inputs.filters.allows(piece)
        };
        let eligible: Vec<bool> = if parallel {
            armor.par_iter().map(is_eligible).collect()
        } else {
            armor.iter().map(is_eligible).collect()
        };

        let build_one = |req: &ResolvedSkill| {
            SkillIndex::build(req, armor, &eligible, inputs.decorations, inputs.charms)
        };
        let mut skills: Vec<SkillIndex<'a>> = if parallel {
            inputs.requirements.par_iter().map(build_one).collect()
        } else {
            inputs.requirements.iter().map(build_one).collect()
        };

        let mut max_capacity_by_slot = [0u32; ArmorSlot::COUNT];
        let mut seen = vec![false; armor.len()];
        for index in &skills {
            for (slot, pieces) in index.by_slot.iter().enumerate() {
                for cached in pieces {
                    seen[cached.index] = true;
                    max_capacity_by_slot[slot] =
                        max_capacity_by_slot[slot].max(cached.piece.total_capacity());
                }
            }
        }
        let eligible_pieces = seen.iter().filter(|&&s| s).count();

        let max_capacity =
            max_capacity_by_slot.iter().sum::<u32>() as usize + inputs.weapon_slots as usize;
        for index in &mut skills {
            index.compute_best_fill(max_capacity);
        }

        Self {
            skills,
            max_capacity_by_slot,
            weapon_slots: inputs.weapon_slots,
            eligible_pieces,
        }
    }

    /// No eligible piece contributes to any requirement
    pub fn is_empty(&self) -> bool {
        self.eligible_pieces == 0
    }

    /// Distinct pieces indexed across all skills
    pub fn eligible_pieces(&self) -> usize {
        self.eligible_pieces
    }

    /// Pieces for requirement `req` in `slot`, in inventory order
    pub fn pieces(&self, req: usize, slot: ArmorSlot) -> &[CachedPiece<'a>] {
        &self.skills[req].by_slot[slot.index()]
    }

    /// Highest contribution to requirement `req` among the cached pieces of `slot`
    pub fn best_in_slot(&self, req: usize, slot: ArmorSlot) -> i32 {
        self.skills[req].best_by_slot[slot.index()]
    }

    pub fn max_capacity(&self, slot: ArmorSlot) -> u32 {
        self.max_capacity_by_slot[slot.index()]
    }

    pub fn weapon_slots(&self) -> u8 {
        self.weapon_slots
    }

    /// Decorations for requirement `req`: most points first, then smallest
    pub fn decorations(&self, req: usize) -> &[&'a Decoration] {
        &self.skills[req].decorations
    }

    /// Charms for requirement `req`: most points first
    pub fn charms(&self, req: usize) -> &[&'a Charm] {
        &self.skills[req].charms
    }

    /// Upper bound on decoration points for `req` given `capacity` in total
    pub fn best_fill(&self, req: usize, capacity: u32) -> i32 {
        let fill = &self.skills[req].best_fill;
        match fill.get(capacity as usize) {
            Some(&points) => points,
            None => fill.last().copied().unwrap_or(0),
        }
    }

    pub fn best_charm(&self, req: usize) -> i32 {
        self.skills[req].best_charm
    }
}

impl<'a> SkillIndex<'a> {
    fn build(
        req: &ResolvedSkill,
        armor: &'a [ArmorPiece],
        eligible: &[bool],
        decorations: &'a [Decoration],
        charms: &'a [Charm],
    ) -> Self {
        let tree = req.skill_tree.as_str();
        let mut index = SkillIndex::default();

        for (i, piece) in armor.iter().enumerate() {
            if !eligible[i] {
                continue;
            }
            let points = piece.points_for(tree);
            if points <= 0 {
                continue;
            }
            let slot = piece.slot.index();
            index.by_slot[slot].push(CachedPiece { index: i, piece });
            index.best_by_slot[slot] = index.best_by_slot[slot].max(points);
        }

        index.decorations = decorations
            .iter()
            .filter(|d| d.skill_tree == tree && d.points > 0 && d.size > 0)
            .collect();
        // Stable: equal jewels keep catalog order.
        index
            .decorations
            .sort_by(|a, b| b.points.cmp(&a.points).then(a.size.cmp(&b.size)));

        index.charms = charms.iter().filter(|c| c.points_for(tree) > 0).collect();
        index
            .charms
            .sort_by(|a, b| b.points_for(tree).cmp(&a.points_for(tree)));
        index.best_charm = index.charms.first().map_or(0, |c| c.points_for(tree));

        index
    }

    /// Unbounded knapsack over this skill's decorations
    ///
    /// Splitting capacity into groups only removes options, so the value for
    /// a total capacity bounds any grouping of it.
    fn compute_best_fill(&mut self, max_capacity: usize) {
        let mut fill = vec![0i32; max_capacity + 1];
        for c in 1..=max_capacity {
            let mut best = fill[c - 1];
            for deco in &self.decorations {
                let size = deco.size as usize;
                if size <= c {
                    best = best.max(fill[c - size] + deco.points);
                }
            }
            fill[c] = best;
        }
        self.best_fill = fill;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExcludedPiecesFilter;

    fn req(tree: &str, points: i32) -> ResolvedSkill {
        ResolvedSkill {
            skill_tree: tree.into(),
            name: tree.into(),
            points_needed: points,
        }
    }

    fn inventory() -> Vec<ArmorPiece> {
        vec![
            ArmorPiece::new("Rath Helm", ArmorSlot::Head)
                .with_skill("Attack", 3)
                .with_slots(&[1]),
            ArmorPiece::new("Bone Helm", ArmorSlot::Head).with_skill("Guard", 2),
            ArmorPiece::new("Kirin Horn", ArmorSlot::Head)
                .with_skill("Attack", 5)
                .with_gender(Gender::Female),
            ArmorPiece::new("Rath Mail", ArmorSlot::Body)
                .with_skill("Attack", 4)
                .with_slots(&[2, 1]),
            ArmorPiece::new("Gunner Mail", ArmorSlot::Body)
                .with_skill("Attack", 9)
                .with_class(ClassType::Gunner),
        ]
    }

    fn build<'a>(
        armor: &'a [ArmorPiece],
        decorations: &'a [Decoration],
        charms: &'a [Charm],
        requirements: &[ResolvedSkill],
        filters: &FilterSet,
        parallel_threshold: usize,
    ) -> ArmorSkillCache<'a> {
        ArmorSkillCache::build(&CacheInputs {
            armor,
            decorations,
            charms,
            requirements,
            class_type: ClassType::Blademaster,
            gender: Gender::Male,
            filters,
            weapon_slots: 1,
            parallel_threshold,
        })
    }

    #[test]
    fn test_index_keeps_only_eligible_contributors() {
        let armor = inventory();
        let reqs = vec![req("Attack", 10)];
        let filters = FilterSet::new();
        let cache = build(&armor, &[], &[], &reqs, &filters, 1000);

        let heads: Vec<&str> = cache
            .pieces(0, ArmorSlot::Head)
            .iter()
            .map(|c| c.piece.name.as_str())
            .collect();
        // Bone Helm has no Attack; Kirin Horn is female only.
        assert_eq!(heads, vec!["Rath Helm"]);

        let bodies: Vec<&str> = cache
            .pieces(0, ArmorSlot::Body)
            .iter()
            .map(|c| c.piece.name.as_str())
            .collect();
        // Gunner Mail is the wrong class.
        assert_eq!(bodies, vec!["Rath Mail"]);
        assert_eq!(cache.eligible_pieces(), 2);
        assert_eq!(cache.best_in_slot(0, ArmorSlot::Body), 4);
    }

    #[test]
    fn test_filters_applied() {
        let armor = inventory();
        let reqs = vec![req("Attack", 10)];
        let filters = FilterSet::new().with(ExcludedPiecesFilter::new(["Rath Mail"]));
        let cache = build(&armor, &[], &[], &reqs, &filters, 1000);
        assert!(cache.pieces(0, ArmorSlot::Body).is_empty());
        assert_eq!(cache.max_capacity(ArmorSlot::Body), 0);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let armor = inventory();
        let reqs = vec![req("Attack", 10), req("Guard", 4)];
        let filters = FilterSet::new();
        let sequential = build(&armor, &[], &[], &reqs, &filters, 1000);
        let parallel = build(&armor, &[], &[], &reqs, &filters, 1);

        for slot in ArmorSlot::ALL {
            for r in 0..reqs.len() {
                let a: Vec<usize> = sequential.pieces(r, slot).iter().map(|c| c.index).collect();
                let b: Vec<usize> = parallel.pieces(r, slot).iter().map(|c| c.index).collect();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_decorations_sorted_and_best_fill() {
        let armor = inventory();
        let decorations = vec![
            Decoration::new("Attack Jewel", "Attack", 1, 1),
            Decoration::new("Attack Jewel+", "Attack", 3, 3),
            Decoration::new("Attack Jewel 2", "Attack", 2, 2),
            Decoration::new("Guard Jewel", "Guard", 1, 1),
        ];
        let reqs = vec![req("Attack", 10)];
        let filters = FilterSet::new();
        let cache = build(&armor, &decorations, &[], &reqs, &filters, 1000);

        let names: Vec<&str> = cache.decorations(0).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Attack Jewel+", "Attack Jewel 2", "Attack Jewel"]);

        // Head 1 + Body 3 + weapon 1
        assert_eq!(cache.max_capacity(ArmorSlot::Head), 1);
        assert_eq!(cache.max_capacity(ArmorSlot::Body), 3);
        assert_eq!(cache.best_fill(0, 0), 0);
        assert_eq!(cache.best_fill(0, 2), 2);
        assert_eq!(cache.best_fill(0, 5), 5);
        // Beyond the largest reachable capacity the bound saturates.
        assert_eq!(cache.best_fill(0, 50), 5);
    }

    #[test]
    fn test_charms_sorted_by_points() {
        let armor = inventory();
        let charms = vec![
            Charm::new("Weak").with_skill("Attack", 2),
            Charm::new("Guard Only").with_skill("Guard", 5),
            Charm::new("Strong").with_skill("Attack", 6),
        ];
        let reqs = vec![req("Attack", 10)];
        let filters = FilterSet::new();
        let cache = build(&armor, &[], &charms, &reqs, &filters, 1000);

        let names: Vec<&str> = cache.charms(0).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Strong", "Weak"]);
        assert_eq!(cache.best_charm(0), 6);
    }

    #[test]
    fn test_unknown_skill_yields_empty_cache() {
        let armor = inventory();
        let reqs = vec![req("Nonexistent", 10)];
        let filters = FilterSet::new();
        let cache = build(&armor, &[], &[], &reqs, &filters, 1000);
        assert!(cache.is_empty());
    }
}
