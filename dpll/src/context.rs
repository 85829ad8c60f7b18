//! Central solver data structure.
use partial_ref::{part, partial, PartialRef, PartialRefTarget};

use crate::clause::ClauseDb;
use crate::config::SolverConfig;
use crate::prop::{Assignment, Trail, UnitQueue, Watchlists};
use crate::state::SolverState;

/// Part declarations for the [`Context`] struct.
mod parts {
    use super::*;

    part!(pub AssignmentP: Assignment);
    part!(pub ClauseDbP: ClauseDb);
    part!(pub ConfigP: SolverConfig);
    part!(pub SolverStateP: SolverState);
    part!(pub TrailP: Trail);
    part!(pub UnitQueueP: UnitQueue);
    part!(pub WatchlistsP: Watchlists);
}

pub use parts::*;

/// Central solver data structure.
///
/// This struct contains all data kept by the solver. Functions operating on multiple fields of
/// the context use partial references provided by the `partial_ref` crate. This documents the
/// data dependencies and makes the borrow checker happy without the overhead of passing
/// individual references.
#[derive(PartialRefTarget, Default)]
pub struct Context {
    #[part = "AssignmentP"]
    assignment: Assignment,
    #[part = "ClauseDbP"]
    clause_db: ClauseDb,
    #[part = "ConfigP"]
    config: SolverConfig,
    #[part = "SolverStateP"]
    solver_state: SolverState,
    #[part = "TrailP"]
    trail: Trail,
    #[part = "UnitQueueP"]
    unit_queue: UnitQueue,
    #[part = "WatchlistsP"]
    watchlists: Watchlists,
}

/// Update structures for a new variable count.
pub fn set_var_count(
    mut ctx: partial!(Context, mut AssignmentP, mut WatchlistsP),
    count: usize,
) {
    ctx.part_mut(AssignmentP).set_var_count(count);
    ctx.part_mut(WatchlistsP).set_var_count(count);
}

/// Increases the variable count to at least the given value.
pub fn ensure_var_count(
    mut ctx: partial!(Context, mut AssignmentP, mut WatchlistsP),
    count: usize,
) {
    if count > ctx.part_mut(AssignmentP).var_count() {
        set_var_count(ctx.borrow(), count)
    }
}
