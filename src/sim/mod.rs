//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No wall clock, rendering, or platform dependencies
//!
//! Given the same seed, tuning, and per-tick inputs, every run produces the
//! same states, so the whole game is testable natively.

pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{captures, catcher_half_width};
pub use input::{InputEvent, InputQueue, Key};
pub use spawn::{difficulty_level, spawn_interval};
pub use state::{
    Boost, Catcher, FallingItem, Flash, FlashKind, GameEvent, GameState, ItemKind, ItemView,
    RoundPhase, Snapshot,
};
pub use tick::{TickInput, tick};
