//! Solver configuration.

/// Configurable parameters used during solving.
pub struct SolverConfig {
    /// Polarity tried first when branching on an unassigned variable. (Default: true)
    pub initial_polarity: bool,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            initial_polarity: true,
        }
    }
}
