//! Micro Defender - A top-down cell-defence survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, progression)
//! - `renderer`: Scene building and the WebGPU draw pipeline
//! - `settings`: Player-facing toggles that survive a restart
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{AimMode, GameSpeed, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical frames per second the game is balanced for (one tick per frame)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Default canvas size used when the host can't report one
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Screen-width breakpoints for the responsive zoom factor
    pub const ZOOM_BREAKPOINTS: [(f32, f32); 3] = [(480.0, 1.5), (768.0, 1.3), (1024.0, 1.15)];

    /// Screens narrower than this use the compact upgrade panel
    pub const MOBILE_BREAKPOINT: f32 = 768.0;

    /// Spacing of the background grid in world units
    pub const GRID_SPACING: f32 = 100.0;
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if distance > 0.0 {
        Some(delta / distance)
    } else {
        None
    }
}

/// Size multiplier applied on level-up: linear growth, capped
#[inline]
pub fn growth_multiplier(level: u32, per_level: f32, cap: f32) -> f32 {
    (1.0 + level.saturating_sub(1) as f32 * per_level).min(cap)
}

/// `value * factor` rounded down, tolerant of f32 error just below a whole number
#[inline]
pub fn scale_floor(value: f32, factor: f32) -> f32 {
    (value * factor + 1e-3).floor()
}
