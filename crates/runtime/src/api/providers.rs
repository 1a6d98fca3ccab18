//! Abstraction for sourcing the player's per-tick intent.
//!
//! Runtime users plug in [`InputProvider`] implementations so a session can
//! run with keyboard input, scripted fixtures, or a random walker.
use game_core::{InputState, WorldSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trait for providing the player's input for the next tick.
///
/// Called once per tick with the snapshot taken before the tick runs.
pub trait InputProvider: Send {
    fn next_input(&mut self, snapshot: &WorldSnapshot) -> InputState;
}

impl<F> InputProvider for F
where
    F: FnMut(&WorldSnapshot) -> InputState + Send,
{
    fn next_input(&mut self, snapshot: &WorldSnapshot) -> InputState {
        self(snapshot)
    }
}

/// Presses nothing. Useful for testing or as a fallback.
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn next_input(&mut self, _snapshot: &WorldSnapshot) -> InputState {
        InputState::empty()
    }
}

/// Plays back a fixed input sequence, then idles (or starts over when looping).
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    inputs: Vec<InputState>,
    cursor: usize,
    looping: bool,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = InputState>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            cursor: 0,
            looping: false,
        }
    }

    /// Expands `(input, ticks)` segments into a script.
    pub fn from_segments(segments: &[(InputState, usize)]) -> Self {
        Self::new(
            segments
                .iter()
                .flat_map(|(input, ticks)| std::iter::repeat_n(*input, *ticks)),
        )
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor)
    }
}

impl InputProvider for ScriptedInput {
    fn next_input(&mut self, _snapshot: &WorldSnapshot) -> InputState {
        if self.cursor >= self.inputs.len() {
            if !self.looping || self.inputs.is_empty() {
                return InputState::empty();
            }
            self.cursor = 0;
        }
        let input = self.inputs[self.cursor];
        self.cursor += 1;
        input
    }
}

/// Random walker for headless sessions.
///
/// Holds a random direction (possibly diagonal, possibly none) for a random
/// number of ticks, with occasional leaps and hides.
pub struct WanderingInput {
    rng: StdRng,
    held: InputState,
    hold_ticks: u32,
}

impl WanderingInput {
    const MIN_HOLD: u32 = 20;
    const MAX_HOLD: u32 = 90;
    const LEAP_CHANCE: f64 = 0.01;
    const HIDE_CHANCE: f64 = 0.002;

    const DIRECTIONS: [InputState; 9] = [
        InputState::empty(),
        InputState::UP,
        InputState::DOWN,
        InputState::LEFT,
        InputState::RIGHT,
        InputState::UP.union(InputState::LEFT),
        InputState::UP.union(InputState::RIGHT),
        InputState::DOWN.union(InputState::LEFT),
        InputState::DOWN.union(InputState::RIGHT),
    ];

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            held: InputState::empty(),
            hold_ticks: 0,
        }
    }
}

impl InputProvider for WanderingInput {
    fn next_input(&mut self, _snapshot: &WorldSnapshot) -> InputState {
        if self.hold_ticks == 0 {
            self.held = Self::DIRECTIONS[self.rng.gen_range(0..Self::DIRECTIONS.len())];
            self.hold_ticks = self.rng.gen_range(Self::MIN_HOLD..=Self::MAX_HOLD);
        }
        self.hold_ticks -= 1;

        let mut input = self.held;
        if self.rng.gen_bool(Self::LEAP_CHANCE) {
            input |= InputState::LEAP;
        }
        if self.rng.gen_bool(Self::HIDE_CHANCE) {
            input |= InputState::HIDE;
        }
        input
    }
}
