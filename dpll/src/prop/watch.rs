//! Watch lists to detect clauses affected by an assignment.
//!
//! Every literal of a registered clause is listed under that literal's watch list entry, so a
//! new assignment discovers exactly the clauses containing the assigned variable and no others.
//! The lists are append only; they are extended when a clause is registered and never reordered
//! or shrunk afterwards. Undoing an assignment therefore walks the same two lists as the
//! assignment itself did, which is what makes the clause counter updates exactly reversible.
//!
//! Independently of the index, each clause keeps its *watched pair* in positions 0 and 1 of its
//! literal sequence. When a watched literal is assigned false while the clause is neither
//! satisfied nor a tautology, the pair is repaired by swapping a still-free literal from the
//! clause's tail into the watched position. A clause that is down to a single free literal has
//! become unit, and one with no free and no true literal is falsified. Unassigning a variable
//! never invalidates the pair, as a watched literal can only go from false back to undefined,
//! so backtracking needs no watch maintenance.
//!
//! See [Section 4.5.1 of the "Handbook of Satisfiability"][handbook-ch4] for background on
//! watched literal schemes.
//!
//! [handbook-ch4]: https://www.satassociation.org/articles/FAIA185-0131.pdf

use dpll_formula::Lit;

use crate::clause::{Clause, ClauseRef};

use super::Assignment;

/// An entry of a literal's watch list.
#[derive(Copy, Clone)]
pub struct Watch {
    /// Clause containing the literal this entry is listed under.
    pub cref: ClauseRef,
}

/// Per-literal index of the clauses affected by assigning that literal's variable.
///
/// Indexed by literal code, so the positive and negative literal of a variable have independent
/// entries.
#[derive(Default)]
pub struct Watchlists {
    watches: Vec<Vec<Watch>>,
}

impl Watchlists {
    /// Update structures for a new variable count.
    pub fn set_var_count(&mut self, count: usize) {
        self.watches.resize(count * 2, vec![]);
    }

    /// Register a clause under each of its literals.
    pub fn watch_clause(&mut self, cref: ClauseRef, lits: &[Lit]) {
        for &lit in lits {
            self.watches[lit.code()].push(Watch { cref });
        }
    }

    /// Entries for clauses containing the given literal.
    pub fn watched_by(&self, lit: Lit) -> &[Watch] {
        &self.watches[lit.code()]
    }
}

/// Repair a clause's watched pair after one of its watched literals was assigned false.
///
/// Swaps a still-free literal from the tail into the falsified watch position, if there is one.
/// Callers skip satisfied and tautological clauses; their watched pair is only revalidated once
/// backtracking has made them undefined again, which undoes the falsification first.
pub fn update_watched_pair(clause: &mut Clause, falsified: Lit, assignment: &Assignment) {
    let lits = clause.lits_mut();

    let mut falsified_pos = None;
    for (pos, &lit) in lits.iter().take(2).enumerate() {
        if lit == falsified {
            falsified_pos = Some(pos);
        }
    }

    let pos = match falsified_pos {
        Some(pos) => pos,
        // The falsified literal was not watched; the pair is still intact.
        None => return,
    };

    for tail in 2..lits.len() {
        if assignment.lit_value(lits[tail]).is_none() {
            lits.swap(pos, tail);
            return;
        }
    }
}
