//! Boolean satisfiability solver.
use partial_ref::{IntoPartialRef, IntoPartialRefMut, PartialRef};

use thiserror::Error;

use dpll_formula::{CnfFormula, Lit, Var};

use crate::config::SolverConfig;
use crate::context::{
    ensure_var_count, set_var_count, AssignmentP, ClauseDbP, ConfigP, Context, SolverStateP,
};
use crate::load::load_clause;
use crate::search::search_step;
use crate::state::SatState;

/// Error while adding a clause to a [`Solver`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("clauses must contain at least one literal")]
    EmptyClause,
    #[error("unknown variable {0:?}")]
    UnknownVariable(Lit),
}

/// A DPLL based SAT solver.
///
/// Variables are created with [`new_var`](Solver::new_var) and clauses over them are added with
/// [`add_clause`](Solver::add_clause) or [`add_formula`](Solver::add_formula). Construction and
/// solving can be interleaved; clauses added after a successful [`solve`](Solver::solve) restart
/// the search from scratch.
pub struct Solver {
    ctx: Box<Context>,
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Solver {
        Solver::with_config(SolverConfig::default())
    }

    /// Create a new solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Solver {
        let mut solver = Solver {
            ctx: Box::new(Context::default()),
        };
        let mut ctx = solver.ctx.into_partial_ref_mut();
        *ctx.part_mut(ConfigP) = config;
        solver
    }

    /// Create a new variable.
    ///
    /// Variables are numbered consecutively starting from zero.
    pub fn new_var(&mut self) -> Var {
        let mut ctx = self.ctx.into_partial_ref_mut();
        let count = ctx.part(AssignmentP).var_count();
        set_var_count(ctx.borrow(), count + 1);
        Var::from_index(count)
    }

    /// Number of variables created so far.
    pub fn var_count(&self) -> usize {
        let ctx = self.ctx.into_partial_ref();
        ctx.part(AssignmentP).var_count()
    }

    /// Number of clauses added so far, counting tautologies.
    pub fn clause_count(&self) -> usize {
        let ctx = self.ctx.into_partial_ref();
        ctx.part(ClauseDbP).count()
    }

    /// Add a single clause, given as a slice of literals.
    ///
    /// All variables in the clause must have been created with [`new_var`](Solver::new_var)
    /// before. A rejected clause leaves the solver unchanged.
    pub fn add_clause(&mut self, clause: &[Lit]) -> Result<(), SolverError> {
        let mut ctx = self.ctx.into_partial_ref_mut();
        load_clause(ctx.borrow(), clause)
    }

    /// Add a formula, creating any missing variables.
    ///
    /// Clauses are added in order until the first rejected clause; the clauses before it stay
    /// added.
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<(), SolverError> {
        let mut ctx = self.ctx.into_partial_ref_mut();
        ensure_var_count(ctx.borrow(), formula.var_count());
        for clause in formula.iter() {
            load_clause(ctx.borrow(), clause)?;
        }
        Ok(())
    }

    /// Check the satisfiability of the current formula.
    pub fn solve(&mut self) -> bool {
        let mut ctx = self.ctx.into_partial_ref_mut();

        while ctx.part(SolverStateP).sat_state == SatState::Unknown {
            search_step(ctx.borrow());
        }

        let state = ctx.part(SolverStateP);
        log::info!(
            "{:?} (decisions: {}, propagations: {}, conflicts: {})",
            state.sat_state,
            state.stats.decisions,
            state.stats.propagations,
            state.stats.conflicts,
        );

        state.sat_state == SatState::Sat
    }

    /// The satisfying assignment found by the last [`solve`](Solver::solve) call.
    ///
    /// Contains one literal per variable, made true by the assignment. `None` unless the last
    /// solve returned true and no clause was added since.
    pub fn model(&self) -> Option<Vec<Lit>> {
        let ctx = self.ctx.into_partial_ref();
        if ctx.part(SolverStateP).sat_state != SatState::Sat {
            return None;
        }
        ctx.part(AssignmentP)
            .assignment()
            .iter()
            .enumerate()
            .map(|(index, value)| value.map(|value| Lit::from_index(index, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use dpll_formula::{cnf_formula, lits};

    use crate::test::{sat_formula, sgen_unsat_formula};

    #[test]
    fn new_vars_are_numbered_consecutively() {
        let mut solver = Solver::new();
        assert_eq!(solver.new_var(), Var::from_index(0));
        assert_eq!(solver.new_var(), Var::from_index(1));
        assert_eq!(solver.var_count(), 2);
    }

    #[test]
    fn clauses_over_unknown_variables_are_rejected() {
        let mut solver = Solver::new();
        solver.new_var();

        assert_eq!(
            solver.add_clause(&lits![1, 2]),
            Err(SolverError::UnknownVariable(lits![2][0]))
        );
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let mut solver = Solver::new();
        assert!(solver.solve());
        assert_eq!(solver.model(), Some(vec![]));
    }

    #[test]
    fn initial_polarity_is_configurable() {
        let mut solver = Solver::with_config(SolverConfig {
            initial_polarity: false,
        });
        solver.new_var();
        assert!(solver.solve());
        assert_eq!(solver.model(), Some(lits![-1].to_vec()));
    }

    #[test]
    fn single_unit_clause_forces_its_literal() {
        let mut solver = Solver::new();
        let x1 = solver.new_var();
        solver.add_clause(&lits![1]).unwrap();

        assert!(solver.solve());
        assert_eq!(solver.model(), Some(vec![x1.positive()]));
    }

    #[test]
    fn propagation_cascade_determines_the_model() {
        let mut solver = Solver::new();
        solver
            .add_formula(&cnf_formula![
                1;
                -1, 2;
            ])
            .unwrap();

        assert!(solver.solve());
        assert_eq!(solver.model(), Some(lits![1, 2].to_vec()));
    }

    #[test]
    fn conflicting_forced_assignments_are_unsat() {
        let mut solver = Solver::new();
        solver
            .add_formula(&cnf_formula![
                1, 2;
                -1, 2;
                -2;
            ])
            .unwrap();

        assert!(!solver.solve());
    }

    #[test]
    fn tautologies_never_conflict() {
        let mut solver = Solver::new();
        solver
            .add_formula(&cnf_formula![
                1, -1;
                -1;
            ])
            .unwrap();

        assert!(solver.solve());
        assert_eq!(solver.model(), Some(lits![-1].to_vec()));
    }

    #[test]
    fn model_is_invalidated_by_new_clauses() {
        let mut solver = Solver::new();
        solver
            .add_formula(&cnf_formula![
                1, 2;
            ])
            .unwrap();

        assert!(solver.solve());
        let model = solver.model().unwrap();

        let blocking: Vec<Lit> = model.iter().map(|&lit| !lit).collect();
        solver.add_clause(&blocking).unwrap();
        assert_eq!(solver.model(), None);

        assert!(solver.solve());
        assert_ne!(solver.model().unwrap(), model);
    }

    #[test]
    fn unsat_is_permanent() {
        let mut solver = Solver::new();
        solver
            .add_formula(&cnf_formula![
                1;
                -1;
            ])
            .unwrap();

        assert!(!solver.solve());

        solver.add_clause(&lits![1]).unwrap();
        assert!(!solver.solve());
        assert_eq!(solver.model(), None);
    }

    proptest! {
        #[test]
        fn sgen_unsat(formula in sgen_unsat_formula(1..7usize)) {
            let mut solver = Solver::new();
            solver.add_formula(&formula).unwrap();
            prop_assert!(!solver.solve());
            prop_assert_eq!(solver.model(), None);
        }

        #[test]
        fn sat(formula in sat_formula(4..20usize, 10..100usize, 0.05..0.2, 0.9..1.0)) {
            let mut solver = Solver::new();
            solver.add_formula(&formula).unwrap();
            prop_assert!(solver.solve());

            let model = solver.model().unwrap();
            let true_lits: std::collections::HashSet<Lit> = model.iter().copied().collect();

            for clause in formula.iter() {
                prop_assert!(clause.iter().any(|lit| true_lits.contains(lit)));
            }
        }
    }
}
