//! Loading clauses into the solver.
use partial_ref::{partial, PartialRef};

use rustc_hash::FxHashSet;

use dpll_formula::Lit;

use crate::clause::{Clause, ClauseStatus};
use crate::context::{
    AssignmentP, ClauseDbP, Context, SolverStateP, TrailP, UnitQueueP, WatchlistsP,
};
use crate::prop::full_restart;
use crate::solver::SolverError;
use crate::state::SatState;

/// Validate a clause and register it with the solver.
///
/// Duplicate literals are dropped and a clause containing a literal and its negation is kept as
/// a tautology that no assignment can unsatisfy. Errors are reported before the solver is
/// touched, so a rejected clause leaves no trace.
///
/// Adding a clause to a solver that already found a model undoes the whole trail first; the old
/// model may not satisfy the new clause. A solver that derived unsatisfiability stays
/// unsatisfiable and ignores further clauses.
pub fn load_clause(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut SolverStateP,
        mut TrailP,
        mut UnitQueueP,
        mut WatchlistsP,
    ),
    lits: &[Lit],
) -> Result<(), SolverError> {
    if lits.is_empty() {
        return Err(SolverError::EmptyClause);
    }

    let var_count = ctx.part(AssignmentP).var_count();
    for &lit in lits {
        if lit.index() >= var_count {
            return Err(SolverError::UnknownVariable(lit));
        }
    }

    match ctx.part(SolverStateP).sat_state {
        SatState::Unsat => return Ok(()),
        SatState::Sat => {
            full_restart(ctx.borrow());
            ctx.part_mut(SolverStateP).sat_state = SatState::Unknown;
        }
        SatState::Unknown => (),
    }

    let mut seen = FxHashSet::default();
    let mut tautology = false;
    let mut clause_lits = Vec::with_capacity(lits.len());

    for &lit in lits {
        if seen.contains(&!lit) {
            tautology = true;
        }
        if seen.insert(lit) {
            clause_lits.push(lit);
        }
    }

    let mut free_lits = 0;
    let mut true_lits = 0;

    {
        let assignment = ctx.part(AssignmentP);

        for &lit in clause_lits.iter() {
            match assignment.lit_value(lit) {
                None => free_lits += 1,
                Some(true) => true_lits += 1,
                Some(false) => (),
            }
        }

        // Move up to two free literals into the watched positions.
        let mut watched = 0;
        for pos in 0..clause_lits.len() {
            if assignment.lit_value(clause_lits[pos]).is_none() {
                clause_lits.swap(watched, pos);
                watched += 1;
                if watched == 2 {
                    break;
                }
            }
        }
    }

    let status = if tautology {
        ClauseStatus::Tautology
    } else if true_lits > 0 {
        ClauseStatus::Satisfied
    } else {
        ClauseStatus::Undefined
    };

    let clause = Clause::new(clause_lits, free_lits, true_lits, status);
    let is_unit = clause.is_unit();
    let is_falsified = clause.is_falsified();

    let cref = ctx.part_mut(ClauseDbP).add_clause(clause);

    let (clause_db, mut ctx) = ctx.split_part(ClauseDbP);
    ctx.part_mut(WatchlistsP)
        .watch_clause(cref, clause_db.clause(cref).lits());

    if is_unit {
        ctx.part_mut(UnitQueueP).push(cref);
    } else if is_falsified {
        ctx.part_mut(SolverStateP).sat_state = SatState::Unsat;
    }

    Ok(())
}
