//! Game state and core simulation types
//!
//! Everything a round owns lives in [`Round`]; [`GameState`] wraps it with
//! the phase machine, RNG and the event queue the front-end drains.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Hazard};
use super::lane::{Lane, LaneRole, Zones};
use super::spawn;
use crate::consts::*;
use crate::settings::GameConfig;
use crate::tile_center_px;

/// Field geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub tile_size: f32,
    pub cols: u32,
    pub rows: u32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            cols: FIELD_COLS,
            rows: FIELD_ROWS,
        }
    }
}

impl Field {
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }
}

/// Road vehicle sprite classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Sedan,
    Racer,
    Bulldozer,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Sedan,
        VehicleClass::Racer,
        VehicleClass::Bulldozer,
        VehicleClass::Truck,
    ];

    /// Pick a class uniformly
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn width(self) -> f32 {
        match self {
            VehicleClass::Sedan => 77.0,
            VehicleClass::Racer => 70.0,
            VehicleClass::Bulldozer => 66.0,
            VehicleClass::Truck => 130.0,
        }
    }
}

/// Log lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSize {
    Short,
    Medium,
    Long,
}

/// Floating platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Log(LogSize),
    /// A raft of this many turtles (one tile each)
    Turtles(u8),
}

/// Variant data of a moving entity, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Vehicle(VehicleClass),
    Platform(PlatformKind),
}

impl EntityKind {
    /// Width and height in pixels
    pub fn size(self, tile_size: f32) -> Vec2 {
        match self {
            EntityKind::Vehicle(class) => Vec2::new(class.width(), 40.0),
            EntityKind::Platform(PlatformKind::Log(size)) => {
                let w = match size {
                    LogSize::Short => 164.0,
                    LogSize::Medium => 242.0,
                    LogSize::Long => 320.0,
                };
                Vec2::new(w, 52.0)
            }
            EntityKind::Platform(PlatformKind::Turtles(n)) => {
                Vec2::new(f32::from(n.max(1)) * tile_size, 45.0)
            }
        }
    }

    pub fn is_platform(self) -> bool {
        matches!(self, EntityKind::Platform(_))
    }

    pub fn is_vehicle(self) -> bool {
        matches!(self, EntityKind::Vehicle(_))
    }
}

/// Looping display-frame counter driven by elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameCycle {
    pub frame: u8,
    pub frames: u8,
    pub interval_ms: f32,
    pub elapsed_ms: f32,
}

impl FrameCycle {
    pub fn new(frames: u8, interval_ms: f32) -> Self {
        Self {
            frame: 0,
            frames: frames.max(1),
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn step(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            self.frame = (self.frame + 1) % self.frames;
        }
    }
}

/// A vehicle or platform travelling along a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    /// Index into [`Round::lanes`]
    pub lane: usize,
    /// Left edge in pixels
    pub x: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
    /// Signed pixels per frame at the target rate
    pub velocity: f32,
    pub kind: EntityKind,
    /// Only animated platforms (turtles) carry a cycle
    pub animation: Option<FrameCycle>,
}

impl MovingEntity {
    pub fn new(
        lane: usize,
        lane_id: f32,
        kind: EntityKind,
        velocity: f32,
        x: f32,
        tile_size: f32,
    ) -> Self {
        let size = kind.size(tile_size);
        let animation = match kind {
            EntityKind::Platform(PlatformKind::Turtles(_)) => {
                Some(FrameCycle::new(TURTLE_FRAMES, TURTLE_FRAME_MS))
            }
            _ => None,
        };
        Self {
            lane,
            x,
            y_center: lane_id * tile_size,
            width: size.x,
            height: size.y,
            velocity,
            kind,
            animation,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_min_size(
            Vec2::new(self.x, self.y_center - self.height / 2.0),
            Vec2::new(self.width, self.height),
        )
    }

    pub fn moving_right(&self) -> bool {
        self.velocity > 0.0
    }

    pub fn display_frame(&self) -> u8 {
        self.animation.map_or(0, |a| a.frame)
    }
}

/// Which way the player is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Tile offset of one hop
    pub fn offset(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Forward-then-idle hop animation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerAnimation {
    pub frame: u8,
    pub moving: bool,
    pub elapsed_ms: f32,
}

impl PlayerAnimation {
    pub fn start(&mut self) {
        self.moving = true;
        self.frame = 0;
        self.elapsed_ms = 0.0;
    }

    pub fn update(&mut self, dt_ms: f32) {
        if !self.moving {
            return;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms > PLAYER_FRAME_MS {
            self.elapsed_ms = 0.0;
            self.frame += 1;
            if self.frame >= PLAYER_FRAMES {
                self.frame = 0;
                self.moving = false;
            }
        }
    }
}

/// The player sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Position in tile units. Rows stay integral; columns pick up
    /// fractions while riding platforms.
    pub tile: Vec2,
    pub facing: Facing,
    pub lives: u8,
    pub animation: PlayerAnimation,
}

impl Player {
    pub fn new(home: Vec2, lives: u8) -> Self {
        Self {
            tile: home,
            facing: Facing::Up,
            lives,
            animation: PlayerAnimation::default(),
        }
    }

    pub fn row(&self) -> i32 {
        self.tile.y.round() as i32
    }

    pub fn center_px(&self, tile_size: f32) -> Vec2 {
        tile_center_px(self.tile, tile_size)
    }

    pub fn hitbox(&self, tile_size: f32) -> Aabb {
        Aabb::from_center_size(
            self.center_px(tile_size),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }

    /// Hop one tile. Returns false (and leaves the player untouched) if the
    /// destination would leave the field.
    pub fn try_hop(&mut self, facing: Facing, field: &Field) -> bool {
        let hitbox = self.hitbox(field.tile_size);
        let step = field.tile_size;
        let allowed = match facing {
            Facing::Left => hitbox.min.x - step >= 0.0,
            Facing::Right => hitbox.max.x + step <= field.width(),
            // Bottom row is the HUD strip
            Facing::Down => hitbox.max.y + step <= field.height() - field.tile_size,
            Facing::Up => true,
        };
        if !allowed {
            return false;
        }

        self.tile += facing.offset();
        self.facing = facing;
        self.animation.start();
        true
    }

    /// Carry horizontally by a pixel displacement
    pub fn carry(&mut self, dx_px: f32, tile_size: f32) {
        self.tile.x += dx_px / tile_size;
    }

    pub fn reset_to(&mut self, home: Vec2) {
        self.tile = home;
        self.facing = Facing::Up;
        self.animation = PlayerAnimation::default();
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

/// A home on the goal row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalSlot {
    /// Centre in pixels
    pub x: f32,
    pub y: f32,
    /// Side length of the square target
    pub size: f32,
    pub filled: bool,
}

impl GoalSlot {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(
            Vec2::new(self.x, self.y),
            Vec2::splat(self.size),
        )
    }

    /// Mark the slot filled. Returns false if it already was.
    pub fn fill(&mut self) -> bool {
        if self.filled {
            return false;
        }
        self.filled = true;
        true
    }
}

/// One round: the board plus everything on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub field: Field,
    pub zones: Zones,
    pub lanes: Vec<Lane>,
    pub entities: Vec<MovingEntity>,
    pub goals: Vec<GoalSlot>,
    pub player: Player,
    /// Player home cell (tile units)
    pub home: Vec2,
}

impl Round {
    pub fn new(config: &GameConfig, rng: &mut Pcg32) -> Self {
        let field = config.field;
        let lanes = config.lanes.clone();
        let zones = Zones::from_lanes(&lanes);
        let entities = spawn::spawn_all(&lanes, &field, rng);

        let goals = lanes
            .iter()
            .filter_map(|lane| match &lane.role {
                LaneRole::Goal { slots } => Some((lane.row(), slots)),
                _ => None,
            })
            .flat_map(|(row, slots)| {
                slots.iter().map(move |&x| GoalSlot {
                    x: x * field.tile_size,
                    y: (row as f32 + GOAL_SLOT_ROW_OFFSET) * field.tile_size,
                    size: field.tile_size * GOAL_SLOT_FRACTION,
                    filled: false,
                })
            })
            .collect();

        let home = config.home_tile();
        Self {
            field,
            zones,
            lanes,
            entities,
            goals,
            player: Player::new(home, config.lives),
            home,
        }
    }

    /// Every goal slot is filled
    pub fn is_won(&self) -> bool {
        !self.goals.is_empty() && self.goals.iter().all(|g| g.filled)
    }

    pub fn is_lost(&self) -> bool {
        self.player.lives == 0
    }

    pub fn filled_goals(&self) -> usize {
        self.goals.iter().filter(|g| g.filled).count()
    }
}

/// Current phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Title prompt, waiting for a key
    Start,
    /// Active gameplay
    Playing,
    /// Brief pause after a hazard before play resumes
    LifeLost { remaining: f32 },
    /// Every goal filled
    Won,
    /// Out of lives
    Lost,
}

/// Something the front-end may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    GoalReached { slot: usize },
    LifeLost { hazard: Hazard, lives_left: u8 },
    RoundWon,
    RoundLost,
    QuitRequested,
}

/// Waits for a fresh key press on Start/Won/Lost screens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGate {
    /// Seconds left during which presses are discarded
    pub grace: f32,
}

impl ScreenGate {
    pub fn entered() -> Self {
        Self { grace: SCREEN_GRACE }
    }

    /// Consume this frame's key presses; true once a press lands after the grace window
    pub fn accept(&mut self, pressed: bool, dt: f32) -> bool {
        let open = self.grace <= 0.0;
        self.grace -= dt;
        open && pressed
    }
}

/// RNG seed plus stream, so each round draws its own reproducible sequence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub rng_state: RngState,
    pub phase: Phase,
    pub round: Round,
    pub gate: ScreenGate,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set when the player asked to quit; the frame loop exits before drawing
    pub quit_requested: bool,
    /// Pending events (drained by the front-end)
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let rng_state = RngState::new(config.seed);
        let round = Round::new(&config, &mut rng_state.to_rng());
        Self {
            config,
            rng_state,
            phase: Phase::Start,
            round,
            gate: ScreenGate::entered(),
            time_ticks: 0,
            quit_requested: false,
            events: Vec::new(),
        }
    }

    /// Rebuild the round from config: lives and goals reset, fresh traffic
    pub fn reset_round(&mut self) {
        self.rng_state.stream += 1;
        self.round = Round::new(&self.config, &mut self.rng_state.to_rng());
    }

    /// Enter a phase; screens re-arm their key gate
    pub fn enter(&mut self, phase: Phase) {
        if matches!(phase, Phase::Start | Phase::Won | Phase::Lost) {
            self.gate = ScreenGate::entered();
        }
        self.phase = phase;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Field {
        Field::default()
    }

    #[test]
    fn test_hop_rejected_at_edges() {
        let mut player = Player::new(Vec2::new(0.0, 11.0), 3);
        assert!(!player.try_hop(Facing::Left, &field()));
        assert_eq!(player.tile, Vec2::new(0.0, 11.0));

        // Home row sits directly above the HUD strip
        assert!(!player.try_hop(Facing::Down, &field()));

        player.tile.x = 10.0;
        assert!(!player.try_hop(Facing::Right, &field()));
        assert!(player.try_hop(Facing::Left, &field()));
        assert_eq!(player.tile.x, 9.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_hop_up_is_unbounded() {
        let mut player = Player::new(Vec2::new(5.0, 0.0), 3);
        assert!(player.try_hop(Facing::Up, &field()));
        assert_eq!(player.tile.y, -1.0);
    }

    #[test]
    fn test_hop_animation_returns_to_idle() {
        let mut player = Player::new(Vec2::new(5.0, 11.0), 3);
        assert!(player.try_hop(Facing::Up, &field()));
        assert!(player.animation.moving);

        let mut seen = Vec::new();
        for _ in 0..PLAYER_FRAMES {
            player.animation.update(17.0);
            seen.push(player.animation.frame);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 0]);
        assert!(!player.animation.moving);
    }

    #[test]
    fn test_goal_fills_once() {
        let mut slot = GoalSlot {
            x: 90.0,
            y: 96.0,
            size: 15.0,
            filled: false,
        };
        assert!(slot.fill());
        assert!(!slot.fill());
        assert!(slot.filled);
    }

    #[test]
    fn test_turtle_cycle_wraps() {
        let mut cycle = FrameCycle::new(3, 240.0);
        cycle.step(239.0);
        assert_eq!(cycle.frame, 0);
        cycle.step(1.0);
        assert_eq!(cycle.frame, 1);
        cycle.step(480.0);
        assert_eq!(cycle.frame, 0);
    }

    #[test]
    fn test_new_state_starts_on_title() {
        let state = GameState::new(GameConfig::default());
        assert_eq!(state.phase, Phase::Start);
        assert_eq!(state.round.player.lives, STARTING_LIVES);
        assert_eq!(state.round.goals.len(), 5);
        assert!(!state.round.is_won());
    }

    #[test]
    fn test_reset_round_is_reproducible() {
        let mut a = GameState::new(GameConfig::default());
        let mut b = GameState::new(GameConfig::default());
        a.reset_round();
        b.reset_round();
        assert_eq!(a.round.entities, b.round.entities);
    }
}
