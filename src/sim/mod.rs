//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical step per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn/fire order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod enemies;
pub mod geometry;
pub mod input;
pub mod progression;
pub mod projectiles;
pub mod state;
pub mod tick;

pub use camera::{Camera, zoom_for_width};
pub use enemies::{contact_damage, enemy_health, spawn_interval, step_enemies, try_spawn};
pub use geometry::{Facing, Rect, WorldBounds, overlaps};
pub use input::{Command, HeldKeys, InputQueue, TickInput};
pub use progression::{
    Loadout, Progression, Upgrade, apply_level_up, kills_required, select_upgrade,
};
pub use projectiles::{Kill, fire, pointer_direction, spread_directions, step_projectiles};
pub use state::{
    AUTO_FIRE_HINT, Enemy, GameEvent, GamePhase, GameState, HordeState, Notice, Notices, Player,
    Projectile, WeaponSettings,
};
pub use tick::tick;
