//! Draining the unit clause worklist.
use partial_ref::{partial, PartialRef};

use dpll_formula::Lit;

use crate::clause::ClauseRef;
use crate::context::{
    AssignmentP, ClauseDbP, Context, SolverStateP, TrailP, UnitQueueP, WatchlistsP,
};

use super::{assign_literal, Reason};

/// A clause that was falsified during propagation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Conflict(pub ClauseRef);

/// Worklist of clauses that possibly became unit.
///
/// Entries can go stale when later assignments satisfy or falsify the enqueued clause, so each
/// entry is re-checked when it is popped. After a conflict the queue only holds clauses that
/// became unit below the failed decision; backtracking clears it.
#[derive(Default)]
pub struct UnitQueue {
    queue: Vec<ClauseRef>,
    head: usize,
}

impl UnitQueue {
    pub fn push(&mut self, cref: ClauseRef) {
        self.queue.push(cref)
    }

    pub fn pop(&mut self) -> Option<ClauseRef> {
        let cref = self.queue.get(self.head).copied();
        if cref.is_some() {
            self.head += 1;
        } else {
            self.clear();
        }
        cref
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.head = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.head >= self.queue.len()
    }
}

/// Assign all literals forced by unit clauses until a fixed point or conflict is reached.
///
/// Every forced assignment can enqueue further unit clauses through its watch list scan; the
/// cascade runs until the worklist is drained. On a conflict propagation stops immediately
/// without undoing the forced assignments already made; resolving the conflict is the search
/// driver's job.
pub fn propagate(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut SolverStateP,
        mut TrailP,
        mut UnitQueueP,
        WatchlistsP,
    ),
) -> Result<(), Conflict> {
    while let Some(cref) = ctx.part_mut(UnitQueueP).pop() {
        if !ctx.part(ClauseDbP).clause(cref).is_unit() {
            // Stale entry: the clause was satisfied or repaired since it was enqueued.
            continue;
        }

        let forced = forced_literal(ctx.borrow(), cref);
        debug_assert!(forced.is_some(), "unit clause without a free literal");

        if let Some(forced) = forced {
            ctx.part_mut(SolverStateP).stats.propagations += 1;
            assign_literal(ctx.borrow(), forced, Reason::Propagation(cref))?;
        }
    }

    Ok(())
}

/// The single free literal of a unit clause, forced to the polarity that satisfies the clause.
fn forced_literal(ctx: partial!(Context, AssignmentP, ClauseDbP), cref: ClauseRef) -> Option<Lit> {
    let assignment = ctx.part(AssignmentP);
    ctx.part(ClauseDbP)
        .clause(cref)
        .lits()
        .iter()
        .copied()
        .find(|&lit| assignment.lit_value(lit).is_none())
}
