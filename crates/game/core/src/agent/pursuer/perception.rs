use crate::agent::PlayerAgent;
use crate::config::PursuerConfig;
use crate::geometry::{Vec2, normalize_angle};

/// What the pursuer senses of the player at the start of a tick.
///
/// Vision is a cone test on distance and bearing only; obstacles never
/// occlude. Hearing needs the player to be moving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    pub sees: bool,
    pub hears: bool,
    pub distance: f32,
}

impl Perception {
    pub fn sense(position: Vec2, facing: f32, player: &PlayerAgent, config: &PursuerConfig) -> Self {
        let distance = position.distance_to(player.position());
        Self {
            sees: can_see(position, facing, player, config),
            hears: can_hear(position, player, config),
            distance,
        }
    }

    pub fn notices(&self) -> bool {
        self.sees || self.hears
    }
}

pub fn can_see(position: Vec2, facing: f32, player: &PlayerAgent, config: &PursuerConfig) -> bool {
    if player.is_hidden() {
        return false;
    }
    let target = player.position();
    if position.distance_to(target) > config.vision_distance {
        return false;
    }
    let offset = normalize_angle(position.bearing_to(target) - facing);
    offset.abs() <= config.half_vision_angle_radians()
}

pub fn can_hear(position: Vec2, player: &PlayerAgent, config: &PursuerConfig) -> bool {
    if player.is_hidden() || player.velocity().is_zero() {
        return false;
    }
    position.distance_to(player.position()) < config.hearing_radius
}

/// Circle overlap of the two bodies; a hidden player cannot be caught.
pub fn can_catch(position: Vec2, player: &PlayerAgent, config: &PursuerConfig) -> bool {
    if player.is_hidden() {
        return false;
    }
    position.distance_to(player.position()) < config.size / 2.0 + player.size() / 2.0
}
