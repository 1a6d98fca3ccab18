//! The single owner of per-session state and its tick function.
//!
//! Every tick runs the same fixed order: clamp the delta, move the player, move
//! the pursuer, test for a catch, collect items (feeding the pursuer's speed
//! bonus and the goal unlock), then test for the escape. Side effects for
//! presentation are returned as [`TickEvent`]s instead of being pushed to
//! collaborators.
use std::sync::Arc;

use crate::agent::{Facing, InputState, ModeChange, PlayerAgent, PursuerAgent, PursuerMode};
use crate::config::GameConfig;
use crate::env::{GenerationReport, MapGenerator, PcgRng, SeedStream, TileGrid};
use crate::geometry::Vec2;
use crate::items::{Item, ItemField, ItemKind, PlacementReport};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Running,
    /// The pursuer reached the player.
    Caught,
    /// The player reached the unlocked goal.
    Escaped,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        self != SessionStatus::Running
    }
}

/// Something presentation layers may want to react to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickEvent {
    PursuerModeChanged(ModeChange),
    LeapStarted,
    HideStarted,
    HideEnded,
    ItemCollected {
        kind: ItemKind,
        points: u32,
        position: Vec2,
        total_collected: u32,
    },
    GoalUnlocked,
    PlayerCaught,
    PlayerEscaped,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// Index of the tick just run (1-based); unchanged once the session ended.
    pub tick: u64,
    /// Delta actually applied after clamping.
    pub dt: f32,
    pub status: SessionStatus,
    pub events: Vec<TickEvent>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub hidden: bool,
    pub leaping: bool,
    /// Seconds left on the active leap, zero when grounded.
    pub leap_remaining: f32,
    /// Seconds left in hiding, zero when visible.
    pub hide_remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuerView {
    pub position: Vec2,
    pub angle: f32,
    pub mode: PursuerMode,
    /// Countdown of the current mode, zero for untimed modes.
    pub timer: f32,
    pub speed: f32,
}

/// Read-only view handed to rendering, audio and UI collaborators.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub tick: u64,
    pub elapsed: f32,
    pub status: SessionStatus,
    pub player: PlayerView,
    pub pursuer: PursuerView,
    pub score: u32,
    pub items_collected: u32,
    pub items_total: u32,
    pub goal: Vec2,
    pub goal_unlocked: bool,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    config: GameConfig,
    grid: Arc<TileGrid>,
    player: PlayerAgent,
    pursuer: PursuerAgent,
    items: ItemField,
    rng: PcgRng,
    score: u32,
    goal_unlocked: bool,
    tick: u64,
    elapsed: f32,
    status: SessionStatus,
}

impl Simulation {
    /// Assembles a session from a prepared grid and item field.
    ///
    /// The player starts on the grid's spawn point, the pursuer at the centre
    /// of the configured world facing along +x. `rng` drives the pursuer's jitter.
    pub fn new(config: GameConfig, grid: Arc<TileGrid>, items: ItemField, rng: PcgRng) -> Self {
        let player = PlayerAgent::new(&config.player, grid.spawn());
        let bounds = Vec2::new(config.map.width, config.map.height);
        let pursuer = PursuerAgent::new(&config.pursuer, config.map.center(), bounds);
        Self {
            config,
            grid,
            player,
            pursuer,
            items,
            rng,
            score: 0,
            goal_unlocked: false,
            tick: 0,
            elapsed: 0.0,
            status: SessionStatus::Running,
        }
    }

    /// Generates map and items from `seed`, each from its own stream.
    pub fn generate(config: GameConfig, seed: u64) -> (Self, GenerationReport, PlacementReport) {
        let (grid, generation) =
            MapGenerator::new(&config).generate(&mut PcgRng::for_stream(seed, SeedStream::Map));
        let (simulation, placement) = Self::with_grid(config, Arc::new(grid), seed);
        (simulation, generation, placement)
    }

    /// Places items on an existing grid and starts a session over it.
    pub fn with_grid(config: GameConfig, grid: Arc<TileGrid>, seed: u64) -> (Self, PlacementReport) {
        let (items, placement) = ItemField::scatter(
            &config,
            &grid,
            &mut PcgRng::for_stream(seed, SeedStream::Items),
        );
        let rng = PcgRng::for_stream(seed, SeedStream::Pursuer);
        (Self::new(config, grid, items, rng), placement)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Arc<TileGrid> {
        &self.grid
    }

    pub fn player(&self) -> &PlayerAgent {
        &self.player
    }

    pub fn pursuer(&self) -> &PursuerAgent {
        &self.pursuer
    }

    pub fn items(&self) -> &[Item] {
        self.items.items()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn goal_unlocked(&self) -> bool {
        self.goal_unlocked
    }

    /// Runs one tick. Once the session has ended this does nothing and reports
    /// the terminal status with no events.
    pub fn tick(&mut self, dt: f32, input: InputState) -> TickReport {
        if self.status.is_terminal() {
            return TickReport {
                tick: self.tick,
                dt: 0.0,
                status: self.status,
                events: Vec::new(),
            };
        }

        let dt = self.config.clamp_delta(dt);
        self.tick += 1;
        self.elapsed += dt;
        let mut events = Vec::new();

        let step = self.player.update(dt, input, &self.grid);
        if step.hide_ended {
            events.push(TickEvent::HideEnded);
        }
        if step.leap_started {
            events.push(TickEvent::LeapStarted);
        }
        if step.hide_started {
            events.push(TickEvent::HideStarted);
        }

        if let Some(change) = self
            .pursuer
            .update(dt, &self.grid, &self.player, &mut self.rng)
        {
            events.push(TickEvent::PursuerModeChanged(change));
        }

        if self.pursuer.can_catch(&self.player) {
            self.status = SessionStatus::Caught;
            events.push(TickEvent::PlayerCaught);
            return self.report(dt, events);
        }

        let already = self.items.collected_count();
        let picked = self.items.collect_near(self.player.position());
        for (offset, item) in picked.into_iter().enumerate() {
            self.score += item.points();
            let total_collected = already + offset as u32 + 1;
            self.pursuer.increase_speed_for_items(total_collected);
            events.push(TickEvent::ItemCollected {
                kind: item.kind,
                points: item.points(),
                position: item.position,
                total_collected,
            });
        }
        if !self.goal_unlocked && self.items.all_collected() {
            self.goal_unlocked = true;
            events.push(TickEvent::GoalUnlocked);
        }

        if self.goal_unlocked
            && self
                .player
                .is_within(self.grid.goal(), self.config.player.goal_radius)
        {
            self.status = SessionStatus::Escaped;
            events.push(TickEvent::PlayerEscaped);
        }

        self.report(dt, events)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            elapsed: self.elapsed,
            status: self.status,
            player: PlayerView {
                position: self.player.position(),
                velocity: self.player.velocity(),
                facing: self.player.facing(),
                hidden: self.player.is_hidden(),
                leaping: self.player.is_leaping(),
                leap_remaining: self.player.leap_remaining(),
                hide_remaining: self.player.hide_remaining(),
            },
            pursuer: PursuerView {
                position: self.pursuer.position(),
                angle: self.pursuer.angle(),
                mode: self.pursuer.mode(),
                timer: self.pursuer.state().timer(),
                speed: self.pursuer.speed(),
            },
            score: self.score,
            items_collected: self.items.collected_count(),
            items_total: self.items.total(),
            goal: self.grid.goal(),
            goal_unlocked: self.goal_unlocked,
        }
    }

    fn report(&self, dt: f32, events: Vec<TickEvent>) -> TickReport {
        TickReport {
            tick: self.tick,
            dt,
            status: self.status,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{RngSource, TileKind};

    fn open_grid() -> Arc<TileGrid> {
        Arc::new(TileGrid::new(
            32,
            24,
            64.0,
            Vec2::new(150.0, 150.0),
            Vec2::new(1850.0, 1350.0),
        ))
    }

    fn item(x: f32, y: f32, kind: ItemKind) -> Item {
        Item {
            position: Vec2::new(x, y),
            kind,
            collected: false,
        }
    }

    fn session(items: Vec<Item>) -> Simulation {
        let config = GameConfig::default();
        let field = ItemField::new(items, 35.0);
        Simulation::new(config, open_grid(), field, PcgRng::new(5))
    }

    #[test]
    fn delta_is_clamped() {
        let mut sim = session(vec![item(1500.0, 1000.0, ItemKind::Apple)]);
        let report = sim.tick(2.0, InputState::empty());
        assert_eq!(report.dt, 0.1);
        assert!((sim.elapsed() - 0.1).abs() < 1e-6);
        assert_eq!(report.tick, 1);
    }

    #[test]
    fn collecting_scores_and_speeds_up_pursuer() {
        let items = (0..10)
            .map(|i| item(150.0 + i as f32 * 3.0, 160.0, ItemKind::Carrot))
            .chain([item(1500.0, 1000.0, ItemKind::Apple)])
            .collect();
        let mut sim = session(items);
        let report = sim.tick(0.016, InputState::empty());
        let collected = report
            .events
            .iter()
            .filter(|event| matches!(event, TickEvent::ItemCollected { .. }))
            .count();
        assert_eq!(collected, 10);
        assert_eq!(sim.score(), 20);
        assert_eq!(sim.pursuer().speed(), 190.0);
        assert!(!sim.goal_unlocked());
    }

    #[test]
    fn collecting_everything_unlocks_goal_then_reaching_it_escapes() {
        let mut sim = session(vec![item(160.0, 150.0, ItemKind::Banana)]);
        let report = sim.tick(0.016, InputState::empty());
        assert!(report.events.contains(&TickEvent::GoalUnlocked));
        assert!(sim.goal_unlocked());
        assert_eq!(report.status, SessionStatus::Running);

        sim.player = sim.player.clone().with_position(Vec2::new(1700.0, 1350.0));
        let mut last = report;
        for _ in 0..20 {
            last = sim.tick(0.05, InputState::RIGHT);
            if last.status.is_terminal() {
                break;
            }
        }
        assert_eq!(last.status, SessionStatus::Escaped);
        assert!(last.events.contains(&TickEvent::PlayerEscaped));
        assert!(sim.player().position().distance_to(sim.grid().goal()) < 40.0);
    }

    #[test]
    fn empty_field_unlocks_goal_on_first_tick() {
        let mut sim = session(Vec::new());
        assert!(!sim.goal_unlocked());

        let first = sim.tick(0.016, InputState::empty());
        assert_eq!(first.events, vec![TickEvent::GoalUnlocked]);
        assert!(sim.goal_unlocked());

        let second = sim.tick(0.016, InputState::empty());
        assert!(!second.events.contains(&TickEvent::GoalUnlocked));
    }

    #[test]
    fn catch_ends_the_session_and_freezes_it() {
        let mut sim = session(vec![item(1500.0, 1000.0, ItemKind::Apple)]);
        sim.player = sim.player.clone().with_position(Vec2::new(1010.0, 750.0));
        let report = sim.tick(0.016, InputState::empty());
        assert_eq!(report.status, SessionStatus::Caught);
        assert!(report.events.contains(&TickEvent::PlayerCaught));

        let frozen = sim.snapshot();
        let after = sim.tick(0.016, InputState::RIGHT);
        assert_eq!(after.status, SessionStatus::Caught);
        assert!(after.events.is_empty());
        assert_eq!(sim.snapshot(), frozen);
    }

    #[test]
    fn snapshot_exposes_ability_and_mode_countdowns() {
        let mut sim = session(vec![item(1500.0, 1000.0, ItemKind::Apple)]);
        sim.tick(0.016, InputState::HIDE);
        let view = sim.snapshot();
        assert!(view.player.hidden);
        assert_eq!(view.player.hide_remaining, sim.config().player.hide_duration);
        assert_eq!(view.player.leap_remaining, 0.0);
        assert_eq!(view.pursuer.timer, sim.pursuer().state().timer());

        let mut leaper = session(vec![item(1500.0, 1000.0, ItemKind::Apple)]);
        leaper.tick(0.016, InputState::LEAP);
        let view = leaper.snapshot();
        assert!(view.player.leaping);
        assert_eq!(view.player.leap_remaining, leaper.config().player.leap_duration);
        assert_eq!(view.player.hide_remaining, 0.0);
    }

    #[test]
    fn hidden_player_is_not_caught() {
        let mut sim = session(vec![item(1500.0, 1000.0, ItemKind::Apple)]);
        sim.player = sim.player.clone().with_position(Vec2::new(1010.0, 750.0));
        let report = sim.tick(0.016, InputState::HIDE);
        assert!(report.events.contains(&TickEvent::HideStarted));
        assert_eq!(report.status, SessionStatus::Running);
    }

    #[test]
    fn identical_inputs_reproduce_identical_trajectories() {
        let config = GameConfig::default();
        let inputs: Vec<InputState> = (0..600)
            .map(|i| match (i / 40) % 4 {
                0 => InputState::RIGHT,
                1 => InputState::DOWN | InputState::LEAP,
                2 => InputState::LEFT | InputState::UP,
                _ => InputState::HIDE,
            })
            .collect();
        let run = || {
            let (mut sim, _, _) = Simulation::generate(config.clone(), 4242);
            inputs
                .iter()
                .map(|input| {
                    sim.tick(1.0 / 60.0, *input);
                    (sim.player().position(), sim.pursuer().position())
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn restored_grid_reproduces_the_session() {
        let config = GameConfig::default();
        let (original, _, _) = Simulation::generate(config.clone(), 99);
        let grid = original.grid().clone();
        let copy = Arc::new(
            TileGrid::from_tiles(
                grid.cols(),
                grid.rows(),
                grid.tile_size(),
                grid.cells().map(|(_, _, kind)| kind).collect(),
                grid.spawn(),
                grid.goal(),
            )
            .expect("valid grid"),
        );
        assert_eq!(copy.digest(), grid.digest());

        let (mut a, _) = Simulation::with_grid(config.clone(), grid, 99);
        let (mut b, _) = Simulation::with_grid(config, copy, 99);
        for i in 0..400 {
            let input = if i % 90 < 45 {
                InputState::RIGHT | InputState::DOWN
            } else {
                InputState::UP
            };
            let ra = a.tick(1.0 / 60.0, input);
            let rb = b.tick(1.0 / 60.0, input);
            assert_eq!(ra, rb);
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }

    #[test]
    fn different_jitter_streams_diverge() {
        let grid = open_grid();
        let config = GameConfig::default();
        let field = ItemField::new(vec![item(1500.0, 1000.0, ItemKind::Apple)], 35.0);
        let mut a = Simulation::new(config.clone(), grid.clone(), field.clone(), PcgRng::new(1));
        let mut b = Simulation::new(config, grid, field, PcgRng::new(1));
        b.rng.next_u32();
        a.tick(0.1, InputState::empty());
        b.tick(0.1, InputState::empty());
        assert_ne!(a.pursuer().angle(), b.pursuer().angle());
    }

    #[test]
    fn fence_blocks_walking_player_in_session() {
        let mut grid = TileGrid::new(32, 24, 64.0, Vec2::new(150.0, 150.0), Vec2::new(1850.0, 1350.0));
        grid.set(3, 2, TileKind::Jumpable);
        let field = ItemField::new(vec![item(1500.0, 1000.0, ItemKind::Apple)], 35.0);
        let mut sim = Simulation::new(GameConfig::default(), Arc::new(grid), field, PcgRng::new(8));
        for _ in 0..30 {
            sim.tick(0.02, InputState::RIGHT);
        }
        assert!(sim.player().position().x < 192.0 - 15.0 + 0.01);
    }
}
