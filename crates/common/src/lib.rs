//! Shared value types used across the afterglow workspace.

mod types;

pub use types::{Euler, PointerPosition, Rgb, Viewport};
