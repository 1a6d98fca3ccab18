//! Perception-driven pursuer.
//!
//! Each update senses the player, runs one step of the
//! wander/detect/chase/search machine to pick a velocity, then integrates that
//! velocity per axis against the grid. Jumpable fences never stop the pursuer.
mod perception;
mod speed;
mod state;

use core::f32::consts::{FRAC_PI_2, PI};

pub use perception::{Perception, can_catch, can_hear, can_see};
pub use speed::SpeedModel;
pub use state::{ModeChange, PursuerMode, PursuerState};

use crate::agent::PlayerAgent;
use crate::config::PursuerConfig;
use crate::env::{RngSource, TileGrid};
use crate::geometry::Vec2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuerAgent {
    position: Vec2,
    velocity: Vec2,
    /// Facing in radians; also the axis of the vision cone.
    angle: f32,
    speed: f32,
    state: PursuerState,
    speed_model: SpeedModel,
    /// World extent used by the wander clamp.
    bounds: Vec2,
    config: PursuerConfig,
}

impl PursuerAgent {
    const WANDER_SPEED: f32 = 0.6;
    const WANDER_JITTER: f32 = 0.25;
    const SEARCH_SPEED: f32 = 0.7;
    const SEARCH_ARRIVAL: f32 = 10.0;
    const SEARCH_WALK_SPEED: f32 = 0.3;
    const SEARCH_TURN_CHANCE: f32 = 0.05;
    const SEARCH_TURN_JITTER: f32 = 0.5;

    pub fn new(config: &PursuerConfig, position: Vec2, bounds: Vec2) -> Self {
        let speed_model = SpeedModel::new(config);
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            speed: speed_model.speed(),
            state: PursuerState::Wander,
            speed_model,
            bounds,
            config: config.clone(),
        }
    }

    pub fn with_pose(mut self, position: Vec2, angle: f32) -> Self {
        self.position = position;
        self.angle = angle;
        self
    }

    pub fn with_state(mut self, state: PursuerState) -> Self {
        self.state = state;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> PursuerState {
        self.state
    }

    pub fn mode(&self) -> PursuerMode {
        self.state.mode()
    }

    pub fn last_known(&self) -> Option<Vec2> {
        self.state.last_known()
    }

    pub fn elapsed(&self) -> f32 {
        self.speed_model.elapsed()
    }

    pub fn config(&self) -> &PursuerConfig {
        &self.config
    }

    pub fn perceive(&self, player: &PlayerAgent) -> Perception {
        Perception::sense(self.position, self.angle, player, &self.config)
    }

    pub fn can_catch(&self, player: &PlayerAgent) -> bool {
        can_catch(self.position, player, &self.config)
    }

    /// Folds the player's running item total into the speed ramp.
    pub fn increase_speed_for_items(&mut self, total: u32) {
        self.speed_model.record_items(total);
        self.speed = self.speed_model.speed();
    }

    /// Advances the pursuer by `dt` seconds. Returns the state change, if any.
    pub fn update<R: RngSource + ?Sized>(
        &mut self,
        dt: f32,
        grid: &TileGrid,
        player: &PlayerAgent,
        rng: &mut R,
    ) -> Option<ModeChange> {
        self.speed_model.advance(dt);
        self.speed = self.speed_model.speed();

        let before = self.mode();
        let senses = self.perceive(player);
        let current = self.state;
        self.state = match current {
            PursuerState::Wander => self.wander(&senses, player, rng),
            PursuerState::Detect { timer } => self.detect(timer - dt, &senses, player),
            PursuerState::Chase { last_seen } => self.chase(last_seen, &senses, player),
            PursuerState::Search { timer, last_known } => {
                self.search(timer - dt, last_known, &senses, player, rng)
            }
        };

        self.position =
            grid.probe()
                .slide(self.position, self.velocity * dt, self.config.size / 2.0, false);

        let after = self.mode();
        (before != after).then_some(ModeChange {
            from: before,
            to: after,
        })
    }

    fn wander<R: RngSource + ?Sized>(
        &mut self,
        senses: &Perception,
        player: &PlayerAgent,
        rng: &mut R,
    ) -> PursuerState {
        if senses.notices() {
            let timer = if senses.sees {
                PursuerState::DETECT_ON_SIGHT
            } else {
                PursuerState::DETECT_ON_SOUND
            };
            return PursuerState::Detect { timer };
        }
        if senses.distance > 0.0 {
            self.angle = self.position.bearing_to(player.position()) + rng.jitter(Self::WANDER_JITTER);
            self.velocity = Vec2::from_angle(self.angle) * (self.speed * Self::WANDER_SPEED);
        }
        self.keep_in_bounds();
        PursuerState::Wander
    }

    /// Detect holds no sighting of its own; only hearing sends it searching.
    fn detect(&mut self, timer: f32, senses: &Perception, player: &PlayerAgent) -> PursuerState {
        if senses.sees {
            return PursuerState::Chase {
                last_seen: player.position(),
            };
        }
        if timer > 0.0 {
            return PursuerState::Detect { timer };
        }
        if senses.hears {
            PursuerState::search(None)
        } else {
            PursuerState::Wander
        }
    }

    fn chase(
        &mut self,
        last_seen: Vec2,
        senses: &Perception,
        player: &PlayerAgent,
    ) -> PursuerState {
        if !senses.sees {
            return PursuerState::search(Some(last_seen));
        }
        self.steer_toward(player.position(), self.speed);
        PursuerState::Chase {
            last_seen: player.position(),
        }
    }

    fn search<R: RngSource + ?Sized>(
        &mut self,
        timer: f32,
        mut last_known: Option<Vec2>,
        senses: &Perception,
        player: &PlayerAgent,
        rng: &mut R,
    ) -> PursuerState {
        if senses.sees {
            return PursuerState::Chase {
                last_seen: player.position(),
            };
        }

        match last_known {
            Some(target) if self.position.distance_to(target) > Self::SEARCH_ARRIVAL => {
                self.steer_toward(target, self.speed * Self::SEARCH_SPEED);
            }
            Some(_) => last_known = None,
            None => {
                if rng.chance(Self::SEARCH_TURN_CHANCE) {
                    self.angle += rng.jitter(Self::SEARCH_TURN_JITTER);
                }
                self.velocity = Vec2::from_angle(self.angle) * (self.speed * Self::SEARCH_WALK_SPEED);
            }
        }

        if timer <= 0.0 {
            PursuerState::Wander
        } else {
            PursuerState::Search { timer, last_known }
        }
    }

    fn steer_toward(&mut self, target: Vec2, speed: f32) {
        let delta = target - self.position;
        let distance = delta.length();
        if distance > 0.0 {
            self.angle = delta.y.atan2(delta.x);
            self.velocity = delta * (speed / distance);
        }
    }

    /// Clamps into the world inset by one body size, snapping the facing inward.
    fn keep_in_bounds(&mut self) {
        let margin = self.config.size;
        if self.position.x < margin {
            self.position.x = margin;
            self.angle = 0.0;
        }
        if self.position.x > self.bounds.x - margin {
            self.position.x = self.bounds.x - margin;
            self.angle = PI;
        }
        if self.position.y < margin {
            self.position.y = margin;
            self.angle = FRAC_PI_2;
        }
        if self.position.y > self.bounds.y - margin {
            self.position.y = self.bounds.y - margin;
            self.angle = -FRAC_PI_2;
        }
    }
}
