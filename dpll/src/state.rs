//! Miscellaneous solver state.

/// Satisfiability state.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SatState {
    Unknown,
    Sat,
    Unsat,
}

impl Default for SatState {
    fn default() -> SatState {
        SatState::Unknown
    }
}

/// Search statistics, used for logging.
#[derive(Copy, Clone, Default, Debug)]
pub struct SearchStats {
    /// Number of decisions made, including polarity flips.
    pub decisions: u64,
    /// Number of assignments forced by unit propagation.
    pub propagations: u64,
    /// Number of falsified clauses encountered.
    pub conflicts: u64,
}

/// Miscellaneous solver state.
///
/// Anything larger or any larger group of related state variables should be moved into a
/// separate part of [`Context`](crate::context::Context).
#[derive(Default)]
pub struct SolverState {
    pub sat_state: SatState,
    pub stats: SearchStats,
}
