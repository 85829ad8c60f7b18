//! Variable interpretation and the assignment trail.
use partial_ref::{partial, PartialRef};

use dpll_formula::{Lit, Var};

use crate::clause::ClauseStatus;
use crate::context::{AssignmentP, ClauseDbP, Context, TrailP, UnitQueueP, WatchlistsP};

use super::watch::update_watched_pair;
use super::Conflict;

/// Current partial interpretation of all variables.
#[derive(Default)]
pub struct Assignment {
    assignment: Vec<Option<bool>>,
}

impl Assignment {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.assignment.resize(count, None);
    }

    /// Number of variables known to the interpretation.
    pub fn var_count(&self) -> usize {
        self.assignment.len()
    }

    /// Current partial interpretation as slice.
    pub fn assignment(&self) -> &[Option<bool>] {
        &self.assignment
    }

    /// Truth value of a variable, `None` if unassigned.
    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.assignment[var.index()]
    }

    /// Truth value of a literal, `None` if its variable is unassigned.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.index()].map(|value| value ^ lit.is_negative())
    }

    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.assignment[lit.index()] == Some(lit.is_positive())
    }

    pub fn lit_is_false(&self, lit: Lit) -> bool {
        self.assignment[lit.index()] == Some(lit.is_negative())
    }

    /// Lowest-index variable that is still unassigned.
    pub fn first_unassigned_var(&self) -> Option<Var> {
        self.assignment
            .iter()
            .position(|value| value.is_none())
            .map(Var::from_index)
    }

    /// Make a literal true.
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assignment[lit.index()] = Some(lit.is_positive())
    }

    /// Return a literal's variable to the unassigned state.
    pub fn unassign_lit(&mut self, lit: Lit) {
        self.assignment[lit.index()] = None
    }
}

/// Why a literal was assigned.
///
/// Backtracking may only flip `Decision` entries; flipping a propagation-forced literal would be
/// unsound, and a `FlippedDecision` has no polarity left to try.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Reason {
    /// Trial assignment made by the search driver, other polarity not yet tried.
    Decision,
    /// Second polarity of a decision whose first polarity led to a conflict.
    FlippedDecision,
    /// Forced by the referenced clause becoming unit.
    Propagation(crate::clause::ClauseRef),
}

impl Reason {
    /// True for a decision that still has an untried polarity.
    pub fn is_untried_decision(&self) -> bool {
        match self {
            Reason::Decision => true,
            _ => false,
        }
    }
}

/// One assignment as recorded on the trail.
#[derive(Copy, Clone, Debug)]
pub struct TrailEntry {
    pub lit: Lit,
    pub reason: Reason,
}

/// Chronological record of all assignments, used as an undo stack.
#[derive(Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
}

impl Trail {
    /// Assignments in the order they were made.
    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    /// Number of current assignments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: TrailEntry) {
        self.entries.push(entry)
    }

    fn pop(&mut self) -> Option<TrailEntry> {
        self.entries.pop()
    }
}

/// Make a literal true and record the effect on every clause containing its variable.
///
/// Clauses containing the literal itself gained a true literal and may become satisfied.
/// Clauses containing the negation lost a free literal; their watched pair is repaired and they
/// may become unit (enqueued for propagation) or falsified (reported as a conflict). Both scans
/// always run to completion so the clause counters reflect the full effect of this assignment
/// before a conflict is reported; backtracking relies on that when it reverses the effects.
pub fn assign_literal(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut TrailP,
        mut UnitQueueP,
        WatchlistsP,
    ),
    lit: Lit,
    reason: Reason,
) -> Result<(), Conflict> {
    let assignment = ctx.part_mut(AssignmentP);
    debug_assert!(
        assignment.lit_value(lit).is_none(),
        "double assignment of {:?}",
        lit
    );
    assignment.assign_lit(lit);

    ctx.part_mut(TrailP).push(TrailEntry { lit, reason });

    let (watchlists, mut ctx) = ctx.split_part(WatchlistsP);
    let (assignment, mut ctx) = ctx.split_part(AssignmentP);
    let (clause_db, mut ctx) = ctx.split_part_mut(ClauseDbP);

    for watch in watchlists.watched_by(lit) {
        clause_db.record_literal_assigned(watch.cref, true);
    }

    let mut conflict = None;

    for watch in watchlists.watched_by(!lit) {
        clause_db.record_literal_assigned(watch.cref, false);

        let clause = clause_db.clause_mut(watch.cref);
        if clause.status() != ClauseStatus::Undefined {
            continue;
        }

        update_watched_pair(clause, !lit, assignment);

        if clause.is_unit() {
            ctx.part_mut(UnitQueueP).push(watch.cref);
        } else if clause.is_falsified() && conflict.is_none() {
            conflict = Some(Conflict(watch.cref));
        }
    }

    match conflict {
        None => Ok(()),
        Some(conflict) => Err(conflict),
    }
}

/// Undo the most recent assignment, restoring all clause counters it changed.
///
/// Exact dual of [`assign_literal`]: it walks the same two watch list entries and reverses every
/// counter update. Returns the removed trail entry, or `None` if the trail was empty.
pub fn undo_assignment(
    mut ctx: partial!(Context, mut AssignmentP, mut ClauseDbP, mut TrailP, WatchlistsP),
) -> Option<TrailEntry> {
    let entry = ctx.part_mut(TrailP).pop()?;
    let lit = entry.lit;

    let (watchlists, mut ctx) = ctx.split_part(WatchlistsP);
    let (clause_db, mut ctx) = ctx.split_part_mut(ClauseDbP);

    for watch in watchlists.watched_by(lit) {
        clause_db.record_literal_unassigned(watch.cref, true);
    }

    for watch in watchlists.watched_by(!lit) {
        clause_db.record_literal_unassigned(watch.cref, false);
    }

    ctx.part_mut(AssignmentP).unassign_lit(lit);

    Some(entry)
}

/// Undo the entire trail and reset the unit queue to the structurally unit clauses.
///
/// Used when clause construction resumes after a successful solve.
pub fn full_restart(
    mut ctx: partial!(
        Context,
        mut AssignmentP,
        mut ClauseDbP,
        mut TrailP,
        mut UnitQueueP,
        WatchlistsP,
    ),
) {
    while undo_assignment(ctx.borrow()).is_some() {}

    ctx.part_mut(UnitQueueP).clear();

    let count = ctx.part(ClauseDbP).count();
    for index in 0..count {
        let cref = crate::clause::ClauseRef::from_index(index);
        if ctx.part(ClauseDbP).clause(cref).is_unit() {
            ctx.part_mut(UnitQueueP).push(cref);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use partial_ref::IntoPartialRefMut;
    use proptest::prelude::*;

    use dpll_formula::cnf::strategy::vec_formula;
    use dpll_formula::lits;

    use crate::context::set_var_count;
    use crate::load::load_clause;

    fn counter_snapshot(
        ctx: partial!(Context, ClauseDbP, TrailP),
    ) -> (Vec<(usize, usize, ClauseStatus)>, usize, usize) {
        let clause_db = ctx.part(ClauseDbP);
        let counters = (0..clause_db.count())
            .map(|index| {
                let clause = clause_db.clause(crate::clause::ClauseRef::from_index(index));
                (clause.free_lits(), clause.true_lits(), clause.status())
            })
            .collect();
        (counters, clause_db.unsatisfied(), ctx.part(TrailP).len())
    }

    #[test]
    fn assign_records_and_undo_restores() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 3);
        load_clause(ctx.borrow(), &lits![1, -2, 3]).unwrap();

        let before = counter_snapshot(ctx.borrow());

        assign_literal(ctx.borrow(), lits![2][0], Reason::Decision).unwrap();

        {
            let clause_db = ctx.part(ClauseDbP);
            let clause = clause_db.clause(crate::clause::ClauseRef::from_index(0));
            assert_eq!(clause.free_lits(), 2);
            assert_eq!(clause.true_lits(), 0);
            assert_eq!(clause.status(), ClauseStatus::Undefined);
        }
        assert_eq!(ctx.part(TrailP).len(), 1);

        let entry = undo_assignment(ctx.borrow()).unwrap();
        assert_eq!(entry.lit, lits![2][0]);
        assert_eq!(counter_snapshot(ctx.borrow()), before);
    }

    #[test]
    fn undo_must_follow_trail_order() {
        let mut ctx = Context::default();
        let mut ctx = ctx.into_partial_ref_mut();

        set_var_count(ctx.borrow(), 2);
        load_clause(ctx.borrow(), &lits![1, 2]).unwrap();

        assign_literal(ctx.borrow(), lits![1][0], Reason::Decision).unwrap();
        assign_literal(ctx.borrow(), lits![2][0], Reason::Decision).unwrap();

        assert_eq!(undo_assignment(ctx.borrow()).unwrap().lit, lits![2][0]);
        assert_eq!(undo_assignment(ctx.borrow()).unwrap().lit, lits![1][0]);
        assert!(undo_assignment(ctx.borrow()).is_none());
    }

    proptest! {
        #[test]
        fn assign_undo_is_exact(formula in vec_formula(1..16usize, 1..48usize, 1..6usize)) {
            let mut ctx = Context::default();
            let mut ctx = ctx.into_partial_ref_mut();

            let var_count = formula
                .iter()
                .flat_map(|clause| clause.iter().map(|lit| lit.index() + 1))
                .max()
                .unwrap_or(0);

            set_var_count(ctx.borrow(), var_count);

            for clause in formula.iter() {
                load_clause(ctx.borrow(), clause).unwrap();
            }

            for index in 0..var_count {
                let lit = Lit::from_index(index, index % 2 == 0);

                let before = counter_snapshot(ctx.borrow());

                // A conflict still updates all counters, so the duality must hold either way.
                let _ = assign_literal(ctx.borrow(), lit, Reason::Decision);
                let entry = undo_assignment(ctx.borrow()).unwrap();
                prop_assert_eq!(entry.lit, lit);

                prop_assert_eq!(counter_snapshot(ctx.borrow()), before.clone());

                let _ = assign_literal(ctx.borrow(), lit, Reason::Decision);
            }
        }
    }
}
