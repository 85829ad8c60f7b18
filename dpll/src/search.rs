//! DPLL search with chronological backtracking.
use partial_ref::{partial, PartialRef};

use crate::context::{
    AssignmentP, ClauseDbP, ConfigP, Context, SolverStateP, TrailP, UnitQueueP, WatchlistsP,
};
use crate::decision::make_decision;
use crate::prop::{assign_literal, propagate, undo_assignment, Reason};
use crate::state::SatState;

/// Propagate all forced assignments, then extend the assignment by a decision.
///
/// Sets the solver state to `Sat` when every variable is assigned without a conflict and to
/// `Unsat` when a conflict cannot be resolved by backtracking. Otherwise the state stays
/// `Unknown` and the search continues with the next step.
pub fn search_step(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut SolverStateP,
        mut TrailP,
        mut UnitQueueP,
        ConfigP,
        WatchlistsP,
    ),
) {
    let result = propagate(ctx.borrow());
    let result = match result {
        Ok(()) => make_decision(ctx.borrow()),
        Err(conflict) => Err(conflict),
    };

    match result {
        Ok(true) => (),
        Ok(false) => {
            debug_assert_eq!(ctx.part(ClauseDbP).unsatisfied(), 0);
            ctx.part_mut(SolverStateP).sat_state = SatState::Sat;
        }
        Err(conflict) => {
            log::trace!("conflict in {:?}", conflict.0);
            ctx.part_mut(SolverStateP).stats.conflicts += 1;
            if !backtrack_and_flip(ctx.borrow()) {
                ctx.part_mut(SolverStateP).sat_state = SatState::Unsat;
            }
        }
    }
}

/// Undo assignments until a decision with an untried polarity is found, then flip it.
///
/// Propagation-forced assignments and already flipped decisions are undone without
/// reconsideration; only the other polarity of an untried decision can resolve the conflict. If
/// flipping immediately falsifies another clause the backtracking continues past that decision.
///
/// Returns `false` when the trail runs out of untried decisions, which means the conflict holds
/// under the empty assignment and the formula is unsatisfiable.
fn backtrack_and_flip(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut SolverStateP,
        mut TrailP,
        mut UnitQueueP,
        WatchlistsP,
    ),
) -> bool {
    loop {
        // Pending unit entries were enqueued by assignments at or below the decision we are
        // about to undo. Propagation reaches a fixed point before every decision, so nothing
        // from an earlier level can still be queued.
        ctx.part_mut(UnitQueueP).clear();

        let entry = loop {
            match undo_assignment(ctx.borrow()) {
                None => return false,
                Some(entry) => {
                    if entry.reason.is_untried_decision() {
                        break entry;
                    }
                }
            }
        };

        ctx.part_mut(SolverStateP).stats.decisions += 1;

        log::trace!("flipping {:?}", entry.lit);
        match assign_literal(ctx.borrow(), !entry.lit, Reason::FlippedDecision) {
            Ok(()) => return true,
            Err(_) => {
                ctx.part_mut(SolverStateP).stats.conflicts += 1;
            }
        }
    }
}
