//! The two moving bodies of the chase.
//!
//! Both agents integrate their own velocity against the shared
//! [`TileGrid`](crate::env::TileGrid) through the same collision probe. The
//! pursuer reads the player's public state every tick; the player never reads
//! the pursuer.
mod input;
mod player;
mod pursuer;

pub use input::InputState;
pub use player::{Facing, PlayerAgent, PlayerStep};
pub use pursuer::{ModeChange, Perception, PursuerAgent, PursuerMode, PursuerState, SpeedModel};
