//! Base-combination search over the primary slots
//!
//! Depth-first over `ArmorSlot::ALL`. At each slot the branches are the
//! cached pieces that help a still-unmet requirement (inventory order), then
//! leaving the slot empty. A branch is cut when some unmet requirement can no
//! longer be reached even if every undecided slot took its best piece and
//! every reachable capacity were filled with that skill's best decorations
//! and the best charm were added.

use crate::core::types::ArmorSlot;
use crate::equipment::ArmorPiece;
use crate::search::cache::CachedPiece;
use crate::search::candidate::{ArmorLoadout, CandidateSet, GeneratedArmorSet};
use crate::search::context::{PipelineState, SearchContext};
use crate::search::control::Stage;

/// Run the base search
///
/// Candidates that already meet every requirement go straight into the
/// result sequence; the others are returned, in discovery order, for the
/// decoration stage. Stops once appended + returned reaches the ceiling.
pub fn find_armor_sets<'a>(
    ctx: &SearchContext<'_, 'a>,
    state: &mut PipelineState<'a>,
) -> Vec<CandidateSet<'a>> {
    let mut search = ArmorSearch::new(ctx, state);
    if !search.budget_exhausted() {
        search.visit(0);
    }
    let pending = search.pending;
    tracing::debug!(
        pending = pending.len(),
        appended = state.results.len(),
        "Armor search finished"
    );
    pending
}

struct ArmorSearch<'s, 'c, 'a> {
    ctx: &'s SearchContext<'c, 'a>,
    state: &'s mut PipelineState<'a>,
    pending: Vec<CandidateSet<'a>>,
    loadout: ArmorLoadout<'a>,
    /// Points toward each requirement from the pieces assigned so far
    achieved: Vec<i32>,
    /// Capacity of the pieces assigned so far
    capacity: u32,
    /// remaining_best[i][r]: best points toward r from slots i.. onward
    remaining_best: Vec<Vec<i32>>,
    /// remaining_capacity[i]: most capacity slots i.. onward can add
    remaining_capacity: Vec<u32>,
    halted: bool,
}

impl<'s, 'c, 'a> ArmorSearch<'s, 'c, 'a> {
    fn new(ctx: &'s SearchContext<'c, 'a>, state: &'s mut PipelineState<'a>) -> Self {
        let reqs = ctx.requirements.len();
        let mut remaining_best = vec![vec![0; reqs]; ArmorSlot::COUNT + 1];
        let mut remaining_capacity = vec![0; ArmorSlot::COUNT + 1];
        for slot in ArmorSlot::ALL.iter().rev() {
            let i = slot.index();
            for r in 0..reqs {
                remaining_best[i][r] = remaining_best[i + 1][r] + ctx.cache.best_in_slot(r, *slot);
            }
            remaining_capacity[i] = remaining_capacity[i + 1] + ctx.cache.max_capacity(*slot);
        }

        Self {
            ctx,
            state,
            pending: Vec::new(),
            loadout: [None; ArmorSlot::COUNT],
            achieved: vec![0; reqs],
            capacity: 0,
            remaining_best,
            remaining_capacity,
            halted: false,
        }
    }

    fn budget_exhausted(&self) -> bool {
        self.state.results.len() + self.pending.len() >= self.state.results.ceiling()
    }

    fn visit(&mut self, depth: usize) {
        if self.halted {
            return;
        }
        if self.ctx.should_stop() {
            self.halted = true;
            return;
        }
        self.state.stats.nodes_visited += 1;

        if depth == ArmorSlot::COUNT {
            self.emit_leaf();
            return;
        }

        let slot = ArmorSlot::ALL[depth];
        let branches = self.branches(slot);
        let total = branches.len() + 1;

        for (i, cached) in branches.iter().enumerate() {
            self.assign(slot, cached.piece);
            if self.feasible(depth + 1) {
                self.visit(depth + 1);
            } else {
                self.state.stats.branches_pruned += 1;
            }
            self.unassign(slot, cached.piece);

            if depth == 0 {
                self.ctx
                    .progress
                    .stage(Stage::Armor, (i + 1) as f32 / total as f32);
            }
            if self.halted {
                return;
            }
        }

        // Leave the slot empty.
        if self.feasible(depth + 1) {
            self.visit(depth + 1);
        } else {
            self.state.stats.branches_pruned += 1;
        }
        if depth == 0 {
            self.ctx.progress.stage(Stage::Armor, 1.0);
        }
    }

    /// Cached pieces for `slot` that help an unmet requirement, deduplicated,
    /// in inventory order
    fn branches(&self, slot: ArmorSlot) -> Vec<CachedPiece<'a>> {
        let mut branches: Vec<CachedPiece<'a>> = Vec::new();
        for (r, req) in self.ctx.requirements.iter().enumerate() {
            if req.is_met(self.achieved[r]) {
                continue;
            }
            branches.extend_from_slice(self.ctx.cache.pieces(r, slot));
        }
        branches.sort_by_key(|c| c.index);
        branches.dedup_by_key(|c| c.index);
        branches
    }

    fn assign(&mut self, slot: ArmorSlot, piece: &'a ArmorPiece) {
        self.loadout[slot.index()] = Some(piece);
        for (r, req) in self.ctx.requirements.iter().enumerate() {
            self.achieved[r] += piece.points_for(&req.skill_tree);
        }
        self.capacity += piece.total_capacity();
    }

    fn unassign(&mut self, slot: ArmorSlot, piece: &'a ArmorPiece) {
        self.loadout[slot.index()] = None;
        for (r, req) in self.ctx.requirements.iter().enumerate() {
            self.achieved[r] -= piece.points_for(&req.skill_tree);
        }
        self.capacity -= piece.total_capacity();
    }

    /// Can every unmet requirement still be reached with slots `next..`
    /// undecided?
    fn feasible(&self, next: usize) -> bool {
        let decorations_enabled = self.ctx.limits.decoration_search_limit > 0;
        let capacity = self.capacity
            + self.remaining_capacity[next]
            + self.ctx.cache.weapon_slots() as u32;

        self.ctx.requirements.iter().enumerate().all(|(r, req)| {
            let achieved = self.achieved[r];
            if req.is_met(achieved) {
                return true;
            }
            let mut bound = achieved + self.remaining_best[next][r] + self.ctx.cache.best_charm(r);
            if decorations_enabled {
                bound += self.ctx.cache.best_fill(r, capacity);
            }
            bound >= req.points_needed
        })
    }

    fn emit_leaf(&mut self) {
        if self.loadout.iter().all(Option::is_none) {
            return;
        }

        let candidate = CandidateSet::from_loadout(self.loadout);
        self.state.stats.candidates_found += 1;

        if candidate.is_complete(self.ctx.requirements) {
            let set = GeneratedArmorSet::from_candidate(candidate, self.ctx.weapon_slots);
            self.state.emit(set, self.ctx.requirements);
            self.state.stats.complete_from_armor += 1;
        } else {
            self.pending.push(candidate);
        }

        if self.budget_exhausted() {
            self.halted = true;
        }
    }
}
