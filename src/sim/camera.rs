//! Camera and viewport mapping
//!
//! The camera is derived from the player every frame: it centres on the
//! player's box, scaled by the zoom factor, and clamps to the world edges.
//! A zoom above 1.0 shows *more* of the world (world units per screen pixel).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, WorldBounds};
use crate::consts::ZOOM_BREAKPOINTS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the screen's top-left corner
    pub offset: Vec2,
    /// World units per screen pixel
    pub zoom: f32,
    /// Screen size in pixels
    pub screen: Vec2,
}

impl Camera {
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: zoom_for_width(screen_width),
            screen: Vec2::new(screen_width, screen_height),
        }
    }

    /// Update the screen size; zoom follows the responsive breakpoints
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen = Vec2::new(screen_width, screen_height);
        self.zoom = zoom_for_width(screen_width);
        log::debug!(
            "Viewport {}x{}, zoom factor {}",
            screen_width,
            screen_height,
            self.zoom
        );
    }

    /// Visible world extent
    #[inline]
    pub fn view_size(&self) -> Vec2 {
        self.screen * self.zoom
    }

    /// Visible world region
    pub fn view_rect(&self) -> Rect {
        Rect::from_pos_size(self.offset, self.view_size())
    }

    /// Centre on `target`, keeping the view inside the world where it fits
    pub fn follow(&mut self, target: &Rect, world: &WorldBounds) {
        let view = self.view_size();
        let centred = target.center() - view * 0.5;
        self.offset = Vec2::new(
            centred.x.min(world.width - view.x).max(0.0),
            centred.y.min(world.height - view.y).max(0.0),
        );
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.offset) / self.zoom
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen * self.zoom + self.offset
    }

    /// World rectangle in screen space
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        Rect::from_pos_size(self.world_to_screen(rect.pos), rect.size / self.zoom)
    }

    /// Whether a screen-space rectangle intersects the screen at all
    pub fn is_on_screen(&self, screen_rect: &Rect) -> bool {
        screen_rect.pos.x + screen_rect.size.x > 0.0
            && screen_rect.pos.x < self.screen.x
            && screen_rect.pos.y + screen_rect.size.y > 0.0
            && screen_rect.pos.y < self.screen.y
    }
}

/// Responsive zoom: narrow screens see further
pub fn zoom_for_width(screen_width: f32) -> f32 {
    ZOOM_BREAKPOINTS
        .iter()
        .find(|(below, _)| screen_width < *below)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zoom_breakpoints() {
        assert_eq!(zoom_for_width(400.0), 1.5);
        assert_eq!(zoom_for_width(600.0), 1.3);
        assert_eq!(zoom_for_width(800.0), 1.15);
        assert_eq!(zoom_for_width(1024.0), 1.0);
        assert_eq!(zoom_for_width(1920.0), 1.0);
    }

    #[test]
    fn test_follow_centres_on_player() {
        let mut camera = Camera::new(1280.0, 720.0);
        let world = WorldBounds::new(3000.0, 3000.0);
        let player = Rect::new(1500.0, 1500.0, 40.0, 40.0);
        camera.follow(&player, &world);
        assert_eq!(camera.offset, Vec2::new(1520.0 - 640.0, 1520.0 - 360.0));
        let screen = camera.world_to_screen(player.center());
        assert_eq!(screen, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_follow_clamps_to_world() {
        let mut camera = Camera::new(1280.0, 720.0);
        let world = WorldBounds::new(3000.0, 3000.0);
        camera.follow(&Rect::new(0.0, 0.0, 40.0, 40.0), &world);
        assert_eq!(camera.offset, Vec2::ZERO);
        camera.follow(&Rect::new(2960.0, 2960.0, 40.0, 40.0), &world);
        assert_eq!(camera.offset, Vec2::new(3000.0 - 1280.0, 3000.0 - 720.0));
    }

    #[test]
    fn test_world_smaller_than_view_pins_to_origin() {
        let mut camera = Camera::new(1280.0, 720.0);
        let world = WorldBounds::new(500.0, 500.0);
        camera.follow(&Rect::new(250.0, 250.0, 40.0, 40.0), &world);
        assert_eq!(camera.offset, Vec2::ZERO);
    }

    #[test]
    fn test_zoomed_view_is_larger() {
        let camera = Camera::new(600.0, 800.0);
        assert_eq!(camera.zoom, 1.3);
        assert_eq!(camera.view_size(), Vec2::new(780.0, 1040.0));
        let r = camera.rect_to_screen(&Rect::new(0.0, 0.0, 13.0, 26.0));
        assert!((r.size.x - 10.0).abs() < 1e-4);
        assert!((r.size.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_on_screen_culling() {
        let camera = Camera::new(1280.0, 720.0);
        assert!(camera.is_on_screen(&Rect::new(-5.0, -5.0, 10.0, 10.0)));
        assert!(!camera.is_on_screen(&Rect::new(-20.0, 0.0, 10.0, 10.0)));
        assert!(!camera.is_on_screen(&Rect::new(1280.0, 0.0, 10.0, 10.0)));
    }

    proptest! {
        #[test]
        fn prop_screen_world_round_trip(
            ox in 0.0f32..2000.0,
            oy in 0.0f32..2000.0,
            width in 300.0f32..2000.0,
            sx in 0.0f32..1000.0,
            sy in 0.0f32..1000.0,
        ) {
            let mut camera = Camera::new(width, 720.0);
            camera.offset = Vec2::new(ox, oy);
            let back = camera.world_to_screen(camera.screen_to_world(Vec2::new(sx, sy)));
            prop_assert!((back.x - sx).abs() < 1e-2);
            prop_assert!((back.y - sy).abs() < 1e-2);
        }
    }
}
