use crate::geometry::Vec2;

/// Discrete behaviour of the pursuer, with per-state countdowns and memory.
///
/// Timers count down in seconds. The player's last sighting is carried by
/// `Chase` and `Search` only, so dropping back to `Wander` forgets it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PursuerState {
    /// Drifts toward the player with steering jitter.
    #[default]
    Wander,
    /// Alerted; waits for a sighting before committing.
    Detect { timer: f32 },
    /// Runs straight at the player at full speed.
    Chase { last_seen: Vec2 },
    /// Heads for `last_known` while set, then random-walks.
    Search { timer: f32, last_known: Option<Vec2> },
}

impl PursuerState {
    pub const DETECT_ON_SIGHT: f32 = 2.0;
    pub const DETECT_ON_SOUND: f32 = 1.0;
    pub const SEARCH_DURATION: f32 = 5.0;

    pub fn mode(&self) -> PursuerMode {
        match self {
            PursuerState::Wander => PursuerMode::Wander,
            PursuerState::Detect { .. } => PursuerMode::Detect,
            PursuerState::Chase { .. } => PursuerMode::Chase,
            PursuerState::Search { .. } => PursuerMode::Search,
        }
    }

    /// Remaining countdown of the current state, zero for untimed states.
    pub fn timer(&self) -> f32 {
        match self {
            PursuerState::Detect { timer } | PursuerState::Search { timer, .. } => *timer,
            PursuerState::Wander | PursuerState::Chase { .. } => 0.0,
        }
    }

    /// Where the pursuer last saw the player, while it still remembers.
    pub fn last_known(&self) -> Option<Vec2> {
        match self {
            PursuerState::Chase { last_seen } => Some(*last_seen),
            PursuerState::Search { last_known, .. } => *last_known,
            PursuerState::Wander | PursuerState::Detect { .. } => None,
        }
    }

    /// A fresh search toward `last_known`.
    pub fn search(last_known: Option<Vec2>) -> Self {
        PursuerState::Search {
            timer: Self::SEARCH_DURATION,
            last_known,
        }
    }
}

/// Fieldless tag of [`PursuerState`], for telemetry and presentation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PursuerMode {
    #[default]
    Wander,
    Detect,
    Chase,
    Search,
}

/// A state transition observed during one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    pub from: PursuerMode,
    pub to: PursuerMode,
}
