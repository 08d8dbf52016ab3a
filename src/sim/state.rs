//! Game state data structures

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundPhase {
    /// Waiting for the first input
    NotStarted,
    /// Simulation ticking
    Playing,
    /// Miss limit reached, simulation frozen until reset
    Ended,
}

/// Category of a falling item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    /// Big score on capture
    HighValue,
    /// Small score on capture
    LowValue,
    /// Costs points when captured, harmless to drop
    Penalty,
    /// Activates the boost on capture, worth no points
    PowerUp,
}

impl ItemKind {
    /// Whether letting this item fall past the bottom counts as a miss.
    /// Penalty and power-up items are silently discarded.
    pub fn counts_as_miss(&self) -> bool {
        matches!(self, ItemKind::HighValue | ItemKind::LowValue)
    }
}

/// A falling item in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingItem {
    pub id: u64,
    pub kind: ItemKind,
    /// Position in field percent, x in [0, 100], y grows downward
    pub pos: Vec2,
    /// Descent in percent per tick
    pub speed: f32,
    /// Signed score on capture, 0 for power-ups
    pub points: i32,
}

/// The player-controlled catcher. Only the horizontal position is
/// mutable; the bounding region derives from tuning and boost state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catcher {
    pub x: f32,
}

impl Default for Catcher {
    fn default() -> Self {
        Self {
            x: consts::CATCHER_HOME_X,
        }
    }
}

/// Boost countdown, tracked in ticks so tests can advance it
/// deterministically. Active exactly while ticks remain, so the flag
/// can never disagree with the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boost {
    ticks_left: u32,
}

impl Boost {
    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    /// Remaining duration in whole seconds, rounded up
    pub fn remaining_secs(&self) -> u32 {
        (self.ticks_left * consts::TICK_MS).div_ceil(1000)
    }

    /// Start or restart the countdown. Re-capture resets to the full
    /// duration rather than stacking.
    pub fn activate(&mut self, duration_ticks: u32) {
        self.ticks_left = duration_ticks;
    }

    pub fn tick_down(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }
}

/// Capture feedback flavor, keyed by what was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashKind {
    Good,
    Bad,
    Power,
}

/// A transient feedback flash. Expiry is a tick count, not wall time,
/// and a newer flash simply overwrites an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub expires_at: u64,
}

/// Events emitted during a tick for the platform layer (audio, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    GoodCatch { points: i32 },
    BadCatch { points: i32 },
    Miss,
    BoostStarted,
    RoundOver { new_high_score: bool },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Simulation tick counter, frozen while not Playing
    pub tick_count: u64,
    pub phase: RoundPhase,
    /// May go negative from penalty captures
    pub score: i32,
    pub missed: u32,
    pub high_score: u32,
    pub catcher: Catcher,
    pub items: Vec<FallingItem>,
    pub boost: Boost,
    pub flash: Option<Flash>,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    pub tuning: Tuning,
    /// Seeded RNG for reproducible runs
    pub rng: Pcg32,
    events: Vec<GameEvent>,
    next_item_id: u64,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert_eq!(tuning.validate(), Ok(()));
        Self {
            tick_count: 0,
            phase: RoundPhase::NotStarted,
            score: 0,
            missed: 0,
            high_score: 0,
            catcher: Catcher::default(),
            items: Vec::new(),
            boost: Boost::default(),
            flash: None,
            spawn_timer: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_item_id: 0,
        }
    }

    /// Allocate the next unique item ID
    pub(crate) fn next_item_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh round in one step: score, misses, items, catcher,
    /// boost, and flash all return to their initial values together.
    /// High score, tuning, and the RNG stream survive across rounds.
    pub fn reset_round(&mut self) {
        self.phase = RoundPhase::Playing;
        self.score = 0;
        self.missed = 0;
        self.items.clear();
        self.catcher = Catcher::default();
        self.boost = Boost::default();
        self.flash = None;
        self.spawn_timer = 0;
        self.push_event(GameEvent::RoundStarted);
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            high_score: self.high_score,
            missed: self.missed,
            miss_limit: self.tuning.miss_limit,
            phase: self.phase,
            boost_active: self.boost.is_active(),
            boost_secs: self.boost.remaining_secs(),
            catcher_x: self.catcher.x,
            flash: self.flash.map(|f| f.kind),
            items: self
                .items
                .iter()
                .map(|item| ItemView {
                    id: item.id,
                    kind: item.kind,
                    x: item.pos.x,
                    y: item.pos.y,
                })
                .collect(),
        }
    }
}

/// Per-tick render view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub score: i32,
    pub high_score: u32,
    pub missed: u32,
    pub miss_limit: u32,
    pub phase: RoundPhase,
    pub boost_active: bool,
    pub boost_secs: u32,
    pub catcher_x: f32,
    pub flash: Option<FlashKind>,
    pub items: Vec<ItemView>,
}

/// One falling item as the presentation layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemView {
    pub id: u64,
    pub kind: ItemKind,
    pub x: f32,
    pub y: f32,
}
