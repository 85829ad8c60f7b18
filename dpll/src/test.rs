//! Test helpers.
pub use dpll_formula::test::{sat_formula, sgen_unsat_formula};
