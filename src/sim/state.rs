//! Game state and core simulation types
//!
//! A single `GameState` owns every mutable piece of a run. Subsystems borrow
//! the fields they need; there are no globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geometry::{Facing, Rect, WorldBounds};
use super::progression::{Progression, Upgrade};
use crate::settings::Settings;
use crate::tuning::{Tuning, WeaponTuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen, notices keep fading
    Paused,
    /// Player died; waiting for restart
    GameOver,
}

/// The player's cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame along each held axis
    pub speed: f32,
    pub facing: Facing,
    pub health: f32,
    pub max_health: f32,
    /// Frames until the next shot is allowed
    pub fire_cooldown: u32,
    /// Health restored per kill
    pub life_steal: f32,
    pub auto_fire: bool,
    /// Frames of contact invulnerability left
    #[serde(default)]
    pub contact_cooldown: u32,
}

impl Player {
    /// Fresh player centred in the world
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.player.size);
        let world = WorldBounds::new(tuning.world.width, tuning.world.height);
        Self {
            pos: world.center() - size * 0.5,
            size,
            speed: tuning.player.speed,
            facing: Facing::Right,
            health: tuning.player.health,
            max_health: tuning.player.health,
            fire_cooldown: 0,
            life_steal: 0.0,
            auto_fire: true,
            contact_cooldown: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Restore health, never past the maximum
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Returns true if this hit was fatal
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.is_dead()
    }

    pub fn raise_max_health(&mut self, bonus: f32) {
        self.max_health += bonus;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn toggle_auto_fire(&mut self) -> bool {
        self.auto_fire = !self.auto_fire;
        self.auto_fire
    }
}

/// Global weapon settings; projectiles copy what they need when fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSettings {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub cooldown: u32,
    pub range: f32,
    pub damage: f32,
    pub streams: u32,
}

impl From<&WeaponTuning> for WeaponSettings {
    fn from(t: &WeaponTuning) -> Self {
        Self {
            width: t.width,
            height: t.height,
            speed: t.speed,
            cooldown: t.cooldown,
            range: t.range,
            damage: t.damage,
            streams: t.streams,
        }
    }
}

impl WeaponSettings {
    pub fn projectile_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame at normal game speed
    pub vel: Vec2,
    /// Nearest cardinal of the flight direction (for sprite orientation)
    pub facing: Facing,
    /// Distance covered so far
    pub distance: f32,
    /// Fixed at creation; later upgrades don't touch projectiles in flight
    pub damage: f32,
}

impl Projectile {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A pathogen chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Damage dealt per contact hit, scaled by the level it spawned at
    pub contact_damage: f32,
}

impl Enemy {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Remaining health as a 0-1 fraction
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Enemy-wide settings that progression ratchets up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HordeState {
    /// Chase speed given to newly spawned enemies
    pub speed: f32,
    /// Frames since the last spawn attempt
    pub spawn_counter: u32,
}

/// A timed on-screen text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub frames_left: u32,
}

impl Notice {
    pub fn new(text: impl Into<String>, frames: u32) -> Self {
        Self {
            text: text.into(),
            frames_left: frames,
        }
    }

    /// Opacity fading out over the final `fade` frames
    pub fn alpha(&self, fade: u32) -> f32 {
        if fade == 0 {
            return 1.0;
        }
        (self.frames_left as f32 / fade as f32).min(1.0)
    }
}

/// Status line, banners and the upgrade icon pulse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notices {
    pub message: Option<Notice>,
    pub level_banner: Option<Notice>,
    pub upgrade_result: Option<Notice>,
    /// Phase of the upgrade icon pulse, in frames
    pub pulse: u32,
}

impl Notices {
    pub fn show_message(&mut self, text: impl Into<String>, frames: u32) {
        self.message = Some(Notice::new(text, frames));
    }

    /// Advance all timers by one frame
    pub fn tick(&mut self, pulse_period: u32) {
        for slot in [
            &mut self.message,
            &mut self.level_banner,
            &mut self.upgrade_result,
        ] {
            let expired = match slot {
                Some(notice) => {
                    notice.frames_left = notice.frames_left.saturating_sub(1);
                    notice.frames_left == 0
                }
                None => false,
            };
            if expired {
                *slot = None;
            }
        }
        self.pulse = (self.pulse + 1) % pulse_period.max(1);
    }
}

/// Something that happened during a tick (cleared at the start of each tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { count: usize },
    EnemySpawned { id: u32 },
    EnemyKilled { id: u32, pos: Vec2 },
    PlayerHit { damage: f32 },
    LevelUp { level: u32 },
    UpgradeApplied { upgrade: Upgrade },
    GameOver { score: u64, level: u32 },
    Paused,
    Resumed,
    Restarted,
}

/// Auto-fire hint shown at the start of every run
pub const AUTO_FIRE_HINT: &str = "Auto-fire enabled - Press F to toggle";

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn placement, enemy sizes and jitter all draw from here
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Simulated frames since the run started
    pub frame: u64,
    pub score: u64,
    pub player: Player,
    pub weapon: WeaponSettings,
    pub horde: HordeState,
    /// Live projectiles, in firing order
    pub projectiles: Vec<Projectile>,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    pub progression: Progression,
    pub camera: Camera,
    pub notices: Notices,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run; `screen` is the canvas size in pixels
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, screen: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            weapon: WeaponSettings::from(&tuning.weapon),
            horde: HordeState {
                speed: tuning.horde.speed,
                spawn_counter: 0,
            },
            tuning,
            settings,
            phase: GamePhase::Playing,
            frame: 0,
            score: 0,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            progression: Progression::new(),
            camera: Camera::new(screen.x, screen.y),
            notices: Notices::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.camera.follow(&state.player.rect(), &state.world());
        state.notices.show_message(
            format!(
                "Game speed set to {} (Press G to toggle)",
                state.settings.game_speed.percent()
            ),
            180,
        );
        state
    }

    /// Discard the run and start over; settings, tuning and viewport survive
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.frame = 0;
        self.score = 0;
        self.player = Player::new(&self.tuning);
        self.weapon = WeaponSettings::from(&self.tuning.weapon);
        self.horde = HordeState {
            speed: self.tuning.horde.speed,
            spawn_counter: 0,
        };
        self.projectiles.clear();
        self.enemies.clear();
        self.progression = Progression::new();
        self.notices = Notices::default();
        self.notices.show_message(AUTO_FIRE_HINT, 120);
        let world = self.world();
        self.camera.follow(&self.player.rect(), &world);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn world(&self) -> WorldBounds {
        WorldBounds::new(self.tuning.world.width, self.tuning.world.height)
    }

    /// Movement multiplier from the game-speed setting
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.settings.time_scale()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
