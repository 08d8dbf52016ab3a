//! Snack Drop - a catch-the-falling-snacks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, capture, scoring)
//! - `tuning`: Data-driven game balance
//! - `audio`: Procedural Web Audio sound effects and music
//! - `highscore`: Persisted best score

pub mod audio;
pub mod highscore;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u32 = 16;
    /// Fixed simulation timestep in seconds
    pub const TICK_SECS: f32 = TICK_MS as f32 / 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Play field dimensions in percent units. Items travel from y just
    /// above 0 downward past FIELD_HEIGHT.
    pub const FIELD_WIDTH: f32 = 100.0;
    pub const FIELD_HEIGHT: f32 = 100.0;

    /// Catcher travel limits (safety margin from both edges)
    pub const CATCHER_MIN_X: f32 = 5.0;
    pub const CATCHER_MAX_X: f32 = 95.0;
    /// Catcher rest position for a fresh round
    pub const CATCHER_HOME_X: f32 = 50.0;

    /// Items spawn just above the visible field
    pub const SPAWN_Y: f32 = -5.0;
}

/// Clamp a horizontal position to the catcher's travel range
#[inline]
pub fn clamp_catcher_x(x: f32) -> f32 {
    x.clamp(consts::CATCHER_MIN_X, consts::CATCHER_MAX_X)
}
