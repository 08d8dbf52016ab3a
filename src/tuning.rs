//! Data-driven game balance.
//!
//! All gameplay numbers live in [`Tuning`] so tests and mods can run the
//! simulation under modified rules without touching sim code. Values
//! deserialize from JSON with per-field defaults, so a partial override
//! file is enough.

use serde::{Deserialize, Serialize};

/// Spawn probability for each item category. Entries are fractions of 1
/// and must sum to 1 (within a small epsilon) to form a valid partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub power_up: f32,
    pub high_value: f32,
    pub low_value: f32,
    pub penalty: f32,
}

impl CategoryWeights {
    pub fn total(&self) -> f32 {
        self.power_up + self.high_value + self.low_value + self.penalty
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            power_up: 0.01,
            high_value: 0.19,
            low_value: 0.40,
            penalty: 0.40,
        }
    }
}

/// Complete rule set for one game. `Tuning::default()` is the shipped
/// balance; [`Tuning::validate`] rejects configurations the simulation
/// cannot run under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spawn category distribution
    pub weights: CategoryWeights,

    /// Score awarded per capture, by category
    pub high_value_points: i32,
    pub low_value_points: i32,
    /// Negative: capturing a penalty item costs points
    pub penalty_points: i32,

    /// Score needed to advance one difficulty level
    pub points_per_level: i32,

    /// Spawn cadence in ticks: base interval, reduction per difficulty
    /// level, and the hard floor it never drops below
    pub spawn_interval_base: u32,
    pub spawn_interval_step: u32,
    pub spawn_interval_floor: u32,

    /// Horizontal spawn range in field percent
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,

    /// Fall speed in percent per tick: base, growth per difficulty
    /// level, cap, and the per-item random jitter added on top
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub speed_cap: f32,
    pub speed_jitter: f32,

    /// Catcher movement per tick, normal and boosted
    pub catcher_step: f32,
    pub catcher_step_boosted: f32,

    /// Catcher reach, normal and boosted
    pub catcher_half_width: f32,
    pub catcher_half_width_boosted: f32,
    /// Extra reach granted while boosted, on top of the wider body
    pub catch_forgiveness: f32,

    /// Horizontal extent of a falling item
    pub item_half_width: f32,

    /// Vertical capture band: items are catchable while inside it
    pub capture_band_top: f32,
    pub capture_band_bottom: f32,

    /// Misses that end the round
    pub miss_limit: u32,

    /// Boost duration in ticks (625 ticks * 16 ms = 10 s)
    pub boost_ticks: u32,

    /// Capture feedback flash duration in ticks
    pub flash_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            high_value_points: 5,
            low_value_points: 1,
            penalty_points: -3,
            points_per_level: 15,
            spawn_interval_base: 60,
            spawn_interval_step: 4,
            spawn_interval_floor: 20,
            spawn_x_min: 5.0,
            spawn_x_max: 90.0,
            base_speed: 0.3,
            speed_per_level: 0.04,
            speed_cap: 0.9,
            speed_jitter: 0.4,
            catcher_step: 2.0,
            catcher_step_boosted: 3.0,
            catcher_half_width: 5.0,
            catcher_half_width_boosted: 6.5,
            catch_forgiveness: 3.0,
            item_half_width: 2.0,
            capture_band_top: 85.0,
            capture_band_bottom: 95.0,
            miss_limit: 10,
            boost_ticks: 625,
            flash_ticks: 12,
        }
    }
}

impl Tuning {
    /// Check that a rule set is runnable. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.weights;
        if w.power_up < 0.0 || w.high_value < 0.0 || w.low_value < 0.0 || w.penalty < 0.0 {
            return Err("category weights must be non-negative".into());
        }
        if (w.total() - 1.0).abs() > 1e-4 {
            return Err(format!(
                "category weights must sum to 1, got {}",
                w.total()
            ));
        }
        if self.points_per_level <= 0 {
            return Err("points_per_level must be positive".into());
        }
        if self.spawn_interval_floor == 0 {
            return Err("spawn_interval_floor must be at least 1".into());
        }
        if self.spawn_interval_floor > self.spawn_interval_base {
            return Err("spawn_interval_floor cannot exceed spawn_interval_base".into());
        }
        if !(0.0..=100.0).contains(&self.spawn_x_min)
            || !(0.0..=100.0).contains(&self.spawn_x_max)
            || self.spawn_x_min > self.spawn_x_max
        {
            return Err("spawn x range must be ordered and within the field".into());
        }
        if self.base_speed <= 0.0 {
            return Err("base_speed must be positive".into());
        }
        if self.speed_cap < self.base_speed {
            return Err("speed_cap cannot be below base_speed".into());
        }
        if self.speed_per_level < 0.0 || self.speed_jitter < 0.0 {
            return Err("speed growth and jitter must be non-negative".into());
        }
        if self.catcher_step <= 0.0 || self.catcher_step_boosted <= 0.0 {
            return Err("catcher steps must be positive".into());
        }
        if self.catcher_half_width <= 0.0
            || self.catcher_half_width_boosted <= 0.0
            || self.item_half_width <= 0.0
        {
            return Err("half widths must be positive".into());
        }
        if self.catch_forgiveness < 0.0 {
            return Err("catch_forgiveness must be non-negative".into());
        }
        if self.capture_band_top >= self.capture_band_bottom {
            return Err("capture band must be ordered top above bottom".into());
        }
        if self.miss_limit == 0 {
            return Err("miss_limit must be at least 1".into());
        }
        if self.boost_ticks == 0 || self.flash_ticks == 0 {
            return Err("boost_ticks and flash_ticks must be at least 1".into());
        }
        Ok(())
    }
}
