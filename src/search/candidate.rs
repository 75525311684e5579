//! Candidate and generated sets
//!
//! A `CandidateSet` is what the base search produces: at most one piece per
//! primary slot plus the points they add up to. A `GeneratedArmorSet` extends
//! it with decorations and an optional charm and is what callers receive.

use serde::Serialize;

use crate::core::types::ArmorSlot;
use crate::equipment::{ArmorPiece, Charm, Decoration};
use crate::skills::{ResolvedSkill, SkillPoints};

/// One optional piece per primary slot, indexed by `ArmorSlot::index`
pub type ArmorLoadout<'a> = [Option<&'a ArmorPiece>; ArmorSlot::COUNT];

fn loadout_points(armor: &ArmorLoadout<'_>) -> SkillPoints {
    let mut points = SkillPoints::new();
    for piece in armor.iter().flatten() {
        points.add_all(&piece.skills);
    }
    points
}

/// Points still missing per requirement, in requirement order
fn deficits_of(points: &SkillPoints, requirements: &[ResolvedSkill]) -> Vec<i32> {
    requirements
        .iter()
        .map(|r| r.deficit(points.get(&r.skill_tree)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    pub armor: ArmorLoadout<'a>,
    pub points: SkillPoints,
}

impl<'a> CandidateSet<'a> {
    pub fn from_loadout(armor: ArmorLoadout<'a>) -> Self {
        let points = loadout_points(&armor);
        Self { armor, points }
    }

    pub fn deficits(&self, requirements: &[ResolvedSkill]) -> Vec<i32> {
        deficits_of(&self.points, requirements)
    }

    pub fn is_complete(&self, requirements: &[ResolvedSkill]) -> bool {
        requirements
            .iter()
            .all(|r| r.is_met(self.points.get(&r.skill_tree)))
    }
}

/// Where a decoration is slotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecorationHost {
    Armor(ArmorSlot),
    Weapon,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedDecoration<'a> {
    pub host: DecorationHost,
    /// Index of the capacity group on the host
    pub group: usize,
    pub decoration: &'a Decoration,
}

/// Shortfall on one requirement in a partial match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub skill_tree: String,
    pub missing: i32,
}

/// One scored solution
///
/// `skill_points` always equals the sum of the armor, decoration and charm
/// contributions; `recompute_points` rebuilds it from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArmorSet<'a> {
    pub armor: ArmorLoadout<'a>,
    pub weapon_slots: u8,
    pub decorations: Vec<PlacedDecoration<'a>>,
    pub charm: Option<&'a Charm>,
    pub skill_points: SkillPoints,
    /// Empty for a complete set
    pub shortfalls: Vec<Shortfall>,
}

impl<'a> GeneratedArmorSet<'a> {
    pub fn from_candidate(candidate: CandidateSet<'a>, weapon_slots: u8) -> Self {
        Self {
            armor: candidate.armor,
            weapon_slots,
            decorations: Vec::new(),
            charm: None,
            skill_points: candidate.points,
            shortfalls: Vec::new(),
        }
    }

    pub fn place_decoration(&mut self, host: DecorationHost, group: usize, decoration: &'a Decoration) {
        self.skill_points.add(&decoration.skill_tree, decoration.points);
        self.decorations.push(PlacedDecoration {
            host,
            group,
            decoration,
        });
    }

    pub fn attach_charm(&mut self, charm: &'a Charm) {
        debug_assert!(self.charm.is_none(), "a set holds at most one charm");
        self.skill_points.add_all(&charm.skills);
        self.charm = Some(charm);
    }

    pub fn deficits(&self, requirements: &[ResolvedSkill]) -> Vec<i32> {
        deficits_of(&self.skill_points, requirements)
    }

    pub fn is_complete(&self, requirements: &[ResolvedSkill]) -> bool {
        requirements
            .iter()
            .all(|r| r.is_met(self.skill_points.get(&r.skill_tree)))
    }

    /// Record the remaining shortfalls; called once, right before the set is
    /// appended to the results
    pub fn seal(&mut self, requirements: &[ResolvedSkill]) {
        self.shortfalls = requirements
            .iter()
            .filter_map(|r| {
                let missing = r.deficit(self.skill_points.get(&r.skill_tree));
                (missing > 0).then(|| Shortfall {
                    skill_tree: r.skill_tree.clone(),
                    missing,
                })
            })
            .collect();
    }

    pub fn is_partial(&self) -> bool {
        !self.shortfalls.is_empty()
    }

    /// Rebuild the point totals from the set's contents
    pub fn recompute_points(&self) -> SkillPoints {
        let mut points = loadout_points(&self.armor);
        for placed in &self.decorations {
            points.add(&placed.decoration.skill_tree, placed.decoration.points);
        }
        if let Some(charm) = self.charm {
            points.add_all(&charm.skills);
        }
        points
    }

    pub fn pieces(&self) -> impl Iterator<Item = &'a ArmorPiece> + '_ {
        self.armor.iter().flatten().copied()
    }

    pub fn total_defense(&self) -> u32 {
        self.pieces().map(|p| p.defense).sum()
    }
}

/// Append-only, bounded output of one search
#[derive(Debug)]
pub struct ResultSequence<'a> {
    sets: Vec<GeneratedArmorSet<'a>>,
    ceiling: usize,
}

impl<'a> ResultSequence<'a> {
    pub fn new(ceiling: usize) -> Self {
        Self {
            sets: Vec::new(),
            ceiling,
        }
    }

    /// Append a sealed set; returns false (and drops it) once the ceiling is hit
    pub fn push(&mut self, set: GeneratedArmorSet<'a>) -> bool {
        if self.is_full() {
            return false;
        }
        self.sets.push(set);
        true
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn is_full(&self) -> bool {
        self.sets.len() >= self.ceiling
    }

    pub fn as_slice(&self) -> &[GeneratedArmorSet<'a>] {
        &self.sets
    }

    pub fn into_vec(self) -> Vec<GeneratedArmorSet<'a>> {
        self.sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(tree: &str, points: i32) -> ResolvedSkill {
        ResolvedSkill {
            skill_tree: tree.into(),
            name: format!("{} +1", tree),
            points_needed: points,
        }
    }

    #[test]
    fn test_candidate_points_sum_pieces() {
        let helm = ArmorPiece::new("Helm", ArmorSlot::Head).with_skill("Attack", 3);
        let mail = ArmorPiece::new("Mail", ArmorSlot::Body)
            .with_skill("Attack", 2)
            .with_skill("Guard", 1);
        let mut armor: ArmorLoadout = [None; ArmorSlot::COUNT];
        armor[ArmorSlot::Head.index()] = Some(&helm);
        armor[ArmorSlot::Body.index()] = Some(&mail);

        let candidate = CandidateSet::from_loadout(armor);
        assert_eq!(candidate.points.get("Attack"), 5);
        assert_eq!(candidate.points.get("Guard"), 1);
        assert_eq!(candidate.armor.iter().flatten().count(), 2);

        let reqs = vec![requirement("Attack", 6), requirement("Guard", 1)];
        assert_eq!(candidate.deficits(&reqs), vec![1, 0]);
        assert!(!candidate.is_complete(&reqs));
    }

    #[test]
    fn test_generated_set_points_stay_consistent() {
        let helm = ArmorPiece::new("Helm", ArmorSlot::Head)
            .with_skill("Attack", 4)
            .with_slots(&[1]);
        let jewel = Decoration::new("Attack Jewel", "Attack", 2, 1);
        let charm = Charm::new("Guard Charm").with_skill("Guard", 3);

        let mut armor: ArmorLoadout = [None; ArmorSlot::COUNT];
        armor[ArmorSlot::Head.index()] = Some(&helm);
        let mut set = GeneratedArmorSet::from_candidate(CandidateSet::from_loadout(armor), 0);
        set.place_decoration(DecorationHost::Armor(ArmorSlot::Head), 0, &jewel);
        set.attach_charm(&charm);

        assert_eq!(set.skill_points.get("Attack"), 6);
        assert_eq!(set.skill_points.get("Guard"), 3);
        assert_eq!(set.recompute_points(), set.skill_points);
    }

    #[test]
    fn test_seal_records_shortfalls() {
        let helm = ArmorPiece::new("Helm", ArmorSlot::Head).with_skill("Attack", 4);
        let mut armor: ArmorLoadout = [None; ArmorSlot::COUNT];
        armor[0] = Some(&helm);
        let mut set = GeneratedArmorSet::from_candidate(CandidateSet::from_loadout(armor), 0);

        let reqs = vec![requirement("Attack", 10), requirement("Guard", 2)];
        set.seal(&reqs);
        assert!(set.is_partial());
        assert_eq!(
            set.shortfalls,
            vec![
                Shortfall { skill_tree: "Attack".into(), missing: 6 },
                Shortfall { skill_tree: "Guard".into(), missing: 2 },
            ]
        );
    }

    #[test]
    fn test_result_sequence_respects_ceiling() {
        let helm = ArmorPiece::new("Helm", ArmorSlot::Head);
        let mut armor: ArmorLoadout = [None; ArmorSlot::COUNT];
        armor[0] = Some(&helm);

        let mut results = ResultSequence::new(2);
        for _ in 0..3 {
            let set = GeneratedArmorSet::from_candidate(CandidateSet::from_loadout(armor), 0);
            results.push(set);
        }
        assert_eq!(results.len(), 2);
        assert!(results.is_full());
    }
}
