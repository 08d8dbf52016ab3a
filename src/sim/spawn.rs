//! Falling item production
//!
//! One item per invocation: weighted random category, uniform random x
//! inside the edge margins, speed scaled by difficulty plus jitter.
//! Cadence is owned by the tick loop via [`spawn_interval`].

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, GameState, ItemKind};
use crate::consts;
use crate::tuning::{CategoryWeights, Tuning};

/// Difficulty level derived from score, one level per
/// `points_per_level`. Negative scores stay at level 0.
pub fn difficulty_level(score: i32, points_per_level: i32) -> u32 {
    (score.max(0) / points_per_level) as u32
}

/// Ticks between spawns at the given difficulty level. Shrinks per
/// level down to the configured floor.
pub fn spawn_interval(tuning: &Tuning, level: u32) -> u32 {
    tuning
        .spawn_interval_base
        .saturating_sub(tuning.spawn_interval_step.saturating_mul(level))
        .max(tuning.spawn_interval_floor)
}

/// Base descent speed at the given difficulty level, capped
pub fn level_speed(tuning: &Tuning, level: u32) -> f32 {
    (tuning.base_speed + tuning.speed_per_level * level as f32).min(tuning.speed_cap)
}

/// Map one uniform draw in [0, 1) onto the category partition via the
/// cumulative weight table. Weights are declared once in tuning and
/// validated to sum to 1, so every roll lands in exactly one bucket.
fn pick_kind(roll: f32, weights: &CategoryWeights) -> ItemKind {
    let mut cumulative = weights.power_up;
    if roll < cumulative {
        return ItemKind::PowerUp;
    }
    cumulative += weights.high_value;
    if roll < cumulative {
        return ItemKind::HighValue;
    }
    cumulative += weights.low_value;
    if roll < cumulative {
        return ItemKind::LowValue;
    }
    ItemKind::Penalty
}

/// Spawn one item just above the visible field
pub fn spawn_item(state: &mut GameState) {
    let level = difficulty_level(state.score, state.tuning.points_per_level);
    let weights = state.tuning.weights;
    let (x_min, x_max) = (state.tuning.spawn_x_min, state.tuning.spawn_x_max);
    let base = level_speed(&state.tuning, level);
    let jitter_max = state.tuning.speed_jitter;

    let roll: f32 = state.rng.random();
    let kind = pick_kind(roll, &weights);
    let x = state.rng.random_range(x_min..=x_max);
    let jitter = state.rng.random::<f32>() * jitter_max;

    let points = match kind {
        ItemKind::HighValue => state.tuning.high_value_points,
        ItemKind::LowValue => state.tuning.low_value_points,
        ItemKind::Penalty => state.tuning.penalty_points,
        ItemKind::PowerUp => 0,
    };

    let id = state.next_item_id();
    state.items.push(FallingItem {
        id,
        kind,
        pos: Vec2::new(x, consts::SPAWN_Y),
        speed: base + jitter,
        points,
    });
}
