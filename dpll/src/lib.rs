//! Dpll is a [DPLL][dpll] based SAT solver written in rust. Given a boolean formula in
//! [conjunctive normal form][cnf], it either finds a variable assignment that makes the formula
//! true or determines that no such assignment exists.
//!
//! It performs incremental unit propagation using per-literal watch lists and resolves conflicts
//! by chronological backtracking. Its intended use is resolving dependency and conflict
//! constraints between startup units, encoded as clauses by the caller.
//!
//! [dpll]: https://en.wikipedia.org/wiki/DPLL_algorithm
//! [cnf]: https://en.wikipedia.org/wiki/Conjunctive_normal_form

pub mod config;
pub mod solver;

mod clause;
mod context;
mod decision;
mod load;
mod prop;
mod search;
mod state;

#[cfg(test)]
mod test;

pub use dpll_formula::{cnf, lit, CnfFormula, Lit, Var};
pub use solver::{Solver, SolverError};
