//! Clause storage.
//!
//! Clauses are kept in a growable arena and referenced by index everywhere else in the solver
//! (watch lists, unit queue, trail reasons). This keeps all references valid across arena growth
//! and makes watched literal swaps cheap.
use std::fmt;

use dpll_formula::Lit;

/// Compact reference to a clause stored in a [`ClauseDb`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClauseRef {
    index: u32,
}

impl ClauseRef {
    /// Reference to the clause at the given arena index.
    pub fn from_index(index: usize) -> ClauseRef {
        debug_assert!(index <= u32::max_value() as usize);
        ClauseRef {
            index: index as u32,
        }
    }

    /// Arena index of the referenced clause.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "clause {}", self.index)
    }
}

/// Satisfaction status of a clause.
///
/// `Tautology` is detected once at construction and never changes. `Satisfied` and `Undefined`
/// alternate as true literals of the clause are assigned and unassigned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClauseStatus {
    Undefined,
    Satisfied,
    Tautology,
}

/// A clause and its live counters.
///
/// The literal sequence is fixed at construction up to permutation; the first two positions hold
/// the watched pair. `free_lits` and `true_lits` are updated through
/// [`literal_assigned`](Clause::literal_assigned) and
/// [`literal_unassigned`](Clause::literal_unassigned) only, which are exact duals of each other.
/// This keeps every counter change reversible for backtracking.
pub struct Clause {
    lits: Vec<Lit>,
    free_lits: usize,
    true_lits: usize,
    status: ClauseStatus,
}

impl Clause {
    /// Create a clause with the given counters.
    ///
    /// Used by clause loading, which computes the initial counters under the interpretation
    /// current at construction time.
    pub fn new(lits: Vec<Lit>, free_lits: usize, true_lits: usize, status: ClauseStatus) -> Clause {
        Clause {
            lits,
            free_lits,
            true_lits,
            status,
        }
    }

    /// The clause's literals.
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Mutable slice of the clause's literals, used for watched literal swaps.
    pub fn lits_mut(&mut self) -> &mut [Lit] {
        &mut self.lits
    }

    /// Number of literals, invariant over the clause's lifetime.
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// The literals currently watched, i.e. the first two positions.
    pub fn watched_lits(&self) -> &[Lit] {
        &self.lits[..self.lits.len().min(2)]
    }

    /// Satisfaction status under the current interpretation.
    pub fn status(&self) -> ClauseStatus {
        self.status
    }

    /// Number of literals whose variable is currently unassigned.
    pub fn free_lits(&self) -> usize {
        self.free_lits
    }

    /// Number of literals currently evaluating to true.
    pub fn true_lits(&self) -> usize {
        self.true_lits
    }

    /// Whether the clause forces its single remaining free literal.
    pub fn is_unit(&self) -> bool {
        self.status == ClauseStatus::Undefined && self.true_lits == 0 && self.free_lits == 1
    }

    /// Whether the clause is falsified under the current interpretation.
    ///
    /// This state must never outlive the propagation step that produced it; the search driver
    /// reacts by backtracking.
    pub fn is_falsified(&self) -> bool {
        self.status == ClauseStatus::Undefined && self.true_lits == 0 && self.free_lits == 0
    }

    /// Record that one of the clause's literals was assigned.
    ///
    /// Returns `true` if this satisfied a previously unsatisfied clause.
    fn literal_assigned(&mut self, became_true: bool) -> bool {
        debug_assert!(self.free_lits > 0);
        self.free_lits -= 1;
        if became_true {
            self.true_lits += 1;
            if self.true_lits == 1 && self.status == ClauseStatus::Undefined {
                self.status = ClauseStatus::Satisfied;
                return true;
            }
        }
        false
    }

    /// Record that one of the clause's literals was unassigned. Exact dual of
    /// [`literal_assigned`](Clause::literal_assigned).
    ///
    /// Returns `true` if this made a satisfied clause unsatisfied again.
    fn literal_unassigned(&mut self, was_true: bool) -> bool {
        self.free_lits += 1;
        debug_assert!(self.free_lits <= self.lits.len());
        if was_true {
            debug_assert!(self.true_lits > 0);
            self.true_lits -= 1;
            if self.true_lits == 0 && self.status == ClauseStatus::Satisfied {
                self.status = ClauseStatus::Undefined;
                return true;
            }
        }
        false
    }
}

/// Arena of all clauses registered with the solver.
///
/// Clause storage is append only; the solver never removes or rewrites a registered clause.
#[derive(Default)]
pub struct ClauseDb {
    clauses: Vec<Clause>,
    /// Number of non-tautology clauses whose status is not `Satisfied`.
    unsatisfied: usize,
}

impl ClauseDb {
    /// Add a clause to the arena.
    pub fn add_clause(&mut self, clause: Clause) -> ClauseRef {
        let cref = ClauseRef::from_index(self.clauses.len());
        if clause.status == ClauseStatus::Undefined {
            self.unsatisfied += 1;
        }
        self.clauses.push(clause);
        cref
    }

    /// Number of registered clauses.
    pub fn count(&self) -> usize {
        self.clauses.len()
    }

    /// Number of non-tautology clauses not currently satisfied.
    pub fn unsatisfied(&self) -> usize {
        self.unsatisfied
    }

    /// Read access to a clause.
    pub fn clause(&self, cref: ClauseRef) -> &Clause {
        &self.clauses[cref.index()]
    }

    /// Write access to a clause.
    pub fn clause_mut(&mut self, cref: ClauseRef) -> &mut Clause {
        &mut self.clauses[cref.index()]
    }

    /// Record an assignment of one of a clause's literals, keeping the unsatisfied clause count
    /// in sync.
    pub fn record_literal_assigned(&mut self, cref: ClauseRef, became_true: bool) {
        if self.clauses[cref.index()].literal_assigned(became_true) {
            self.unsatisfied -= 1;
        }
    }

    /// Record the undo of an assignment of one of a clause's literals. Exact dual of
    /// [`record_literal_assigned`](ClauseDb::record_literal_assigned).
    pub fn record_literal_unassigned(&mut self, cref: ClauseRef, was_true: bool) {
        if self.clauses[cref.index()].literal_unassigned(was_true) {
            self.unsatisfied += 1;
        }
    }
}
