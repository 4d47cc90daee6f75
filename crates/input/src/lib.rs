//! Window input mapped to scene actions.
//!
//! The host translates its native events into calls on [`InputState`]; the
//! animator only ever sees [`Action`]s.
//!
//! # Invariants
//! - Pointer positions are logical pixels relative to the window's inner area.
//! - Orbit drags are only emitted while the primary button is held.

pub mod action;
pub mod state;

pub use action::{Action, Key};
pub use state::InputState;
