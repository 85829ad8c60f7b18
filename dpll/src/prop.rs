//! Unit propagation.
pub mod assignment;
pub mod unit;
pub mod watch;

pub use assignment::{assign_literal, full_restart, undo_assignment, Assignment, Reason, Trail};
pub use unit::{propagate, Conflict, UnitQueue};
pub use watch::Watchlists;
