//! Scene building
//!
//! Converts a `GameState` into screen-space triangles plus a HUD view model.
//! Text is left to the host (DOM overlay); everything here is pure so layout
//! and culling can be tested without a GPU.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes::{circle, push_bar, push_outline, push_rect, push_rotated_rect, ring};
use super::vertex::{Vertex, colors};
use crate::consts::{GRID_SPACING, MOBILE_BREAKPOINT};
use crate::scale_floor;
use crate::sim::{Camera, GamePhase, GameState, Notice, Rect, Upgrade, WorldBounds};

const CIRCLE_SEGMENTS: u32 = 24;

/// Layout of the upgrade icon row in the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradePanel {
    /// Top-left of the first icon
    pub origin: Vec2,
    pub icon_size: f32,
    pub gap: f32,
    /// Narrow-screen layout
    pub compact: bool,
}

impl UpgradePanel {
    pub fn for_screen(screen: Vec2) -> Self {
        let compact = screen.x < MOBILE_BREAKPOINT;
        let (icon_size, gap, bottom_margin) = if compact {
            (scale_floor(screen.x, 0.08).max(30.0), 5.0, 100.0)
        } else {
            (50.0, 10.0, 120.0)
        };
        Self {
            origin: Vec2::new(20.0, screen.y - bottom_margin),
            icon_size,
            gap,
            compact,
        }
    }

    pub fn icon_rect(&self, index: usize) -> Rect {
        let x = self.origin.x + index as f32 * (self.icon_size + self.gap);
        Rect::new(x, self.origin.y, self.icon_size, self.icon_size)
    }

    /// Backdrop behind the whole row
    pub fn background(&self) -> Rect {
        let width = (self.icon_size + self.gap) * Upgrade::ALL.len() as f32;
        Rect::new(
            self.origin.x - 10.0,
            self.origin.y - 10.0,
            width + 20.0,
            self.icon_size + 40.0,
        )
    }

    /// Catalog index of the icon under a screen point (edges inclusive)
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        (0..Upgrade::ALL.len()).find(|&i| {
            let rect = self.icon_rect(i);
            let max = rect.max();
            point.x >= rect.pos.x && point.x <= max.x && point.y >= rect.pos.y && point.y <= max.y
        })
    }

    pub fn hint(&self) -> &'static str {
        if self.compact {
            "Tap or press key"
        } else {
            "Press key or click to upgrade"
        }
    }
}

/// Icon opacity for the panel's pulse phase
pub fn pulse_alpha(pulse: u32, period: u32) -> f32 {
    (pulse as f32 / period.max(1) as f32 * PI).sin() * 0.3 + 0.7
}

/// A line of text with its current opacity
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub alpha: f32,
}

impl TextOverlay {
    fn from_notice(notice: &Option<Notice>, fade: u32) -> Option<Self> {
        notice.as_ref().map(|n| Self {
            text: n.text.clone(),
            alpha: n.alpha(fade),
        })
    }
}

/// Upgrade panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub layout: UpgradePanel,
    pub credits: u32,
    pub icon_alpha: f32,
    pub hint: &'static str,
}

/// Everything the HUD text needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub score: u64,
    pub level: u32,
    pub kills_to_next: u32,
    /// Progress through the current level, 0-1
    pub progress: f32,
    /// "current/max", current rounded up
    pub health: String,
    pub health_fraction: f32,
    pub auto_fire: bool,
    pub game_speed: &'static str,
    pub message: Option<TextOverlay>,
    pub level_banner: Option<TextOverlay>,
    pub upgrade_result: Option<TextOverlay>,
    /// Present only while credits are available
    pub panel: Option<PanelView>,
    pub paused: bool,
    pub game_over: bool,
}

/// How many entities survived culling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub enemies: usize,
    pub projectiles: usize,
}

/// One frame's worth of draw data
#[derive(Debug, Clone)]
pub struct Scene {
    /// Triangle list in screen pixels
    pub vertices: Vec<Vertex>,
    pub hud: HudView,
    pub stats: DrawStats,
}

/// Build the frame for the current state
pub fn build_scene(state: &GameState) -> Scene {
    let camera = &state.camera;
    let world = state.world();
    let mut vertices = Vec::with_capacity(4096);
    let mut stats = DrawStats::default();

    push_grid(&mut vertices, camera, &world);

    for enemy in &state.enemies {
        let rect = camera.rect_to_screen(&enemy.rect());
        if !camera.is_on_screen(&rect) {
            continue;
        }
        stats.enemies += 1;
        push_rect(&mut vertices, &rect, colors::PATHOGEN);
        let bar = Rect::new(
            rect.pos.x,
            rect.pos.y - 10.0 / camera.zoom,
            rect.size.x,
            5.0 / camera.zoom,
        );
        push_bar(
            &mut vertices,
            &bar,
            enemy.health_fraction(),
            colors::ENEMY_HEALTH_LOW,
            colors::ENEMY_HEALTH_HIGH,
        );
    }

    for projectile in &state.projectiles {
        let rect = camera.rect_to_screen(&projectile.rect());
        if !camera.is_on_screen(&rect) {
            continue;
        }
        stats.projectiles += 1;
        let angle = projectile.vel.y.atan2(projectile.vel.x);
        push_rotated_rect(&mut vertices, &rect, angle, colors::ANTIBODY);
    }

    push_player(&mut vertices, state);

    let hud = hud_view(state);
    push_hud(&mut vertices, state, &hud);

    match state.phase {
        GamePhase::Paused => push_rect(
            &mut vertices,
            &Rect::from_pos_size(Vec2::ZERO, camera.screen),
            colors::PAUSE_OVERLAY,
        ),
        GamePhase::GameOver => push_rect(
            &mut vertices,
            &Rect::from_pos_size(Vec2::ZERO, camera.screen),
            colors::GAME_OVER_OVERLAY,
        ),
        GamePhase::Playing => {}
    }

    Scene {
        vertices,
        hud,
        stats,
    }
}

/// HUD view model for the current state
pub fn hud_view(state: &GameState) -> HudView {
    let player = &state.player;
    let progression = &state.progression;
    let notices = &state.notices;
    let timing = &state.tuning.notices;

    let panel = (progression.credits > 0).then(|| {
        let layout = UpgradePanel::for_screen(state.camera.screen);
        PanelView {
            layout,
            credits: progression.credits,
            icon_alpha: pulse_alpha(notices.pulse, timing.pulse_period),
            hint: layout.hint(),
        }
    });

    HudView {
        score: state.score,
        level: progression.level,
        kills_to_next: progression.kills_remaining(),
        progress: progression.progress(),
        health: format!("{}/{}", player.health.ceil(), player.max_health),
        health_fraction: if player.max_health > 0.0 {
            (player.health / player.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        },
        auto_fire: player.auto_fire,
        game_speed: state.settings.game_speed.percent(),
        message: TextOverlay::from_notice(&notices.message, timing.message_fade),
        level_banner: TextOverlay::from_notice(&notices.level_banner, timing.banner_fade),
        upgrade_result: TextOverlay::from_notice(&notices.upgrade_result, timing.banner_fade),
        panel,
        paused: state.phase == GamePhase::Paused,
        game_over: state.phase == GamePhase::GameOver,
    }
}

fn push_grid(out: &mut Vec<Vertex>, camera: &Camera, world: &WorldBounds) {
    let view = camera.view_rect();
    let world_rect = camera.rect_to_screen(&Rect::new(0.0, 0.0, world.width, world.height));
    let top = world_rect.pos.y.max(0.0);
    let bottom = world_rect.max().y.min(camera.screen.y);
    let left = world_rect.pos.x.max(0.0);
    let right = world_rect.max().x.min(camera.screen.x);

    let mut x = (view.pos.x / GRID_SPACING).ceil() * GRID_SPACING;
    while x <= view.max().x.min(world.width) {
        let sx = camera.world_to_screen(Vec2::new(x, 0.0)).x;
        push_rect(out, &Rect::new(sx - 0.5, top, 1.0, bottom - top), colors::GRID);
        x += GRID_SPACING;
    }

    let mut y = (view.pos.y / GRID_SPACING).ceil() * GRID_SPACING;
    while y <= view.max().y.min(world.height) {
        let sy = camera.world_to_screen(Vec2::new(0.0, y)).y;
        push_rect(out, &Rect::new(left, sy - 0.5, right - left, 1.0), colors::GRID);
        y += GRID_SPACING;
    }

    push_outline(out, &world_rect, 3.0, colors::WORLD_BORDER);
}

fn push_player(out: &mut Vec<Vertex>, state: &GameState) {
    let camera = &state.camera;
    let player = &state.player;
    let center = camera.world_to_screen(player.center());
    let radius = player.size.x / 2.0 / camera.zoom;

    out.extend(circle(center, radius, colors::PLAYER_MEMBRANE, CIRCLE_SEGMENTS));
    out.extend(ring(
        center,
        radius * 0.9,
        radius,
        colors::ANTIBODY,
        CIRCLE_SEGMENTS,
    ));
    // Nucleus leans toward the facing direction
    let nucleus = center + player.facing.unit() * radius * 0.25;
    out.extend(circle(
        nucleus,
        radius * 0.4,
        colors::PLAYER_NUCLEUS,
        CIRCLE_SEGMENTS,
    ));
}

fn push_hud(out: &mut Vec<Vertex>, state: &GameState, hud: &HudView) {
    let screen = state.camera.screen;

    let health = Rect::new(20.0, screen.y - 30.0, 200.0, 20.0);
    push_bar(
        out,
        &health,
        hud.health_fraction,
        colors::HEALTH_LOW,
        colors::HEALTH_HIGH,
    );
    push_outline(out, &health, 1.0, [1.0; 4]);

    let progress = Rect::new(20.0, 160.0, 200.0, 10.0);
    push_bar(
        out,
        &progress,
        hud.progress,
        colors::PROGRESS_TRACK,
        colors::PROGRESS_FILL,
    );
    push_outline(out, &progress, 1.0, [1.0; 4]);

    if let Some(panel) = &hud.panel {
        push_rect(out, &panel.layout.background(), colors::PANEL);
        let icon = colors::with_alpha(colors::UPGRADE_ICON, panel.icon_alpha);
        for i in 0..Upgrade::ALL.len() {
            let rect = panel.layout.icon_rect(i);
            push_rect(out, &rect, icon);
            push_outline(out, &rect, 2.0, [0.67, 0.67, 0.67, 1.0]);
        }
    }
}
