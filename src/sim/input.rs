//! Input event queue
//!
//! Platform event handlers never touch simulation state directly. They
//! push events here, and the tick loop drains the queue into one
//! [`TickInput`] per tick, so a tick's logic always sees one consistent
//! input reading. The queue is bounded by construction: a held-key set
//! plus the last pointer position, not an unbounded event log.

use super::tick::TickInput;

/// Directional keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
}

/// Raw input events from the platform layer. Pointer positions are in
/// field percent, already mapped from client coordinates by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove(f32),
    PointerStart(f32),
}

/// Accumulates events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    left_held: bool,
    right_held: bool,
    /// Last pointer position since the previous sample, if any
    pointer_x: Option<f32>,
    /// A round-starting input arrived since the previous sample
    start_requested: bool,
    reset_requested: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one platform event. Any press or pointer gesture counts
    /// as a start request; key releases do not.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(Key::Left) => {
                self.left_held = true;
                self.start_requested = true;
            }
            InputEvent::KeyDown(Key::Right) => {
                self.right_held = true;
                self.start_requested = true;
            }
            InputEvent::KeyUp(Key::Left) => self.left_held = false,
            InputEvent::KeyUp(Key::Right) => self.right_held = false,
            InputEvent::PointerMove(x) | InputEvent::PointerStart(x) => {
                self.pointer_x = Some(x);
                self.start_requested = true;
            }
        }
    }

    /// Ask for a fresh round (the Play Again button)
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Drain the queue into one tick's input. Held keys persist until
    /// released; pointer position and the start/reset requests are
    /// one-shot and cleared by this call.
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            left: self.left_held,
            right: self.right_held,
            pointer_x: self.pointer_x.take(),
            start: std::mem::take(&mut self.start_requested),
            reset: std::mem::take(&mut self.reset_requested),
        }
    }
}
