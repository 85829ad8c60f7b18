//! Decision making.
use partial_ref::{partial, PartialRef};

use dpll_formula::Lit;

use crate::context::{
    AssignmentP, ClauseDbP, ConfigP, Context, SolverStateP, TrailP, UnitQueueP, WatchlistsP,
};
use crate::prop::{assign_literal, Conflict, Reason};

/// Make a decision to extend the current assignment.
///
/// Branches on the unassigned variable with the lowest index, trying the configured initial
/// polarity first. Returns `Ok(false)` if no variable is left unassigned, which means the
/// current assignment is a model.
///
/// A decision itself can falsify a clause that was already down to watching the decided
/// variable, so the result carries a possible conflict like propagation does.
pub fn make_decision(
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
) -> Result<bool, Conflict> {
    let var = match ctx.part(AssignmentP).first_unassigned_var() {
        Some(var) => var,
        None => return Ok(false),
    };

    let lit = Lit::from_var(var, ctx.part(ConfigP).initial_polarity);

    ctx.part_mut(SolverStateP).stats.decisions += 1;

    log::trace!("deciding {:?}", lit);
    assign_literal(ctx.borrow(), lit, Reason::Decision)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use partial_ref::IntoPartialRefMut;

    use dpll_formula::lits;

    use crate::context::set_var_count;
    use crate::load::load_clause;

    #[test]
    fn decides_lowest_unassigned_var_with_initial_polarity() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 3);
        load_clause(ctx.borrow(), &lits![1, 2, 3]).unwrap();

        assign_literal(ctx.borrow(), lits![-1][0], Reason::Decision).unwrap();

        assert_eq!(make_decision(ctx.borrow()), Ok(true));
        assert!(ctx.part(AssignmentP).lit_is_true(lits![2][0]));
        assert_eq!(ctx.part(SolverStateP).stats.decisions, 1);
    }

    #[test]
    fn full_assignment_makes_no_decision() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 1);
        load_clause(ctx.borrow(), &lits![1]).unwrap();

        assign_literal(ctx.borrow(), lits![1][0], Reason::Decision).unwrap();

        assert_eq!(make_decision(ctx.borrow()), Ok(false));
        assert_eq!(ctx.part(TrailP).len(), 1);
    }
}
