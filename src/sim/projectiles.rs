//! Antibody firing and flight
//!
//! Two firing styles share one cooldown gate: aimed shots leave the player's
//! centre toward the pointer (extra streams fan out around the aim line),
//! while facing shots leave the matching edge of the player's box and extra
//! streams take the next cardinal directions in turn.

use glam::Vec2;

use super::camera::Camera;
use super::geometry::{Facing, Rect, WorldBounds};
use super::state::{Enemy, GameEvent, GameState, Projectile};

/// An enemy destroyed by a projectile this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub id: u32,
    /// Centre of the enemy when it died
    pub pos: Vec2,
}

/// Aim direction from the player toward a pointer in screen space.
///
/// `None` while the pointer sits inside the dead zone around the player.
pub fn pointer_direction(
    player_center: Vec2,
    camera: &Camera,
    pointer_screen: Vec2,
    dead_zone: f32,
) -> Option<Vec2> {
    let delta = pointer_screen - camera.world_to_screen(player_center);
    if delta.x.abs() < dead_zone && delta.y.abs() < dead_zone {
        return None;
    }
    delta.try_normalize()
}

/// Flight directions for `streams` aimed shots around `primary`.
///
/// Extra streams alternate sides of the aim line, stepping `spread` further
/// out every second stream.
pub fn spread_directions(primary: Vec2, streams: u32, spread: f32) -> Vec<Vec2> {
    let perpendicular = primary.perp();
    (0..streams.max(1))
        .map(|i| {
            if i == 0 {
                return primary;
            }
            let side = if i % 2 == 1 { 1.0 } else { -1.0 };
            let factor = side * i.div_ceil(2) as f32 * spread;
            (primary + perpendicular * factor)
                .try_normalize()
                .unwrap_or(primary)
        })
        .collect()
}

/// Fire the weapon if it is off cooldown; returns the number of projectiles
/// created.
///
/// With `aim` set, shots head along it; otherwise they follow the player's
/// facing.
pub fn fire(state: &mut GameState, aim: Option<Vec2>) -> usize {
    if state.player.fire_cooldown > 0 {
        log::trace!(
            "Fire ignored, {} frames of cooldown left",
            state.player.fire_cooldown
        );
        return 0;
    }

    let player = state.player.rect();
    let size = state.weapon.projectile_size();
    let speed = state.weapon.speed;

    let shots: Vec<(Vec2, Vec2)> = match aim {
        Some(primary) => {
            let edge_offset = state.player.size * 0.5;
            spread_directions(primary, state.weapon.streams, state.tuning.weapon.spread)
                .into_iter()
                .map(|dir| {
                    let edge = player.center() + dir * edge_offset;
                    (edge - size * 0.5, dir)
                })
                .collect()
        }
        None => (0..state.weapon.streams.max(1) as usize)
            .map(|i| {
                let facing = state.player.facing.rotated(i);
                (facing_origin(&player, size, facing), facing.unit())
            })
            .collect(),
    };

    let count = shots.len();
    for (pos, dir) in shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            size,
            vel: dir * speed,
            facing: Facing::from_vector(dir),
            distance: 0.0,
            damage: state.weapon.damage,
        });
    }

    state.player.fire_cooldown = state.weapon.cooldown;
    state.events.push(GameEvent::Fired { count });
    count
}

/// Top-left of a projectile leaving `player` through the edge it faces
fn facing_origin(player: &Rect, size: Vec2, facing: Facing) -> Vec2 {
    let mid_x = player.pos.x + player.size.x / 2.0 - size.x / 2.0;
    let mid_y = player.pos.y + player.size.y / 2.0 - size.y / 2.0;
    match facing {
        Facing::Right => Vec2::new(player.max().x, mid_y),
        Facing::Left => Vec2::new(player.pos.x - size.x, mid_y),
        Facing::Up => Vec2::new(mid_x, player.pos.y - size.y),
        Facing::Down => Vec2::new(mid_x, player.max().y),
    }
}

/// Move every projectile one frame, cull spent ones and resolve hits.
///
/// A projectile damages at most one enemy (the first overlapping one in
/// spawn order) and is consumed by the hit. Enemies reduced to zero health
/// are removed and reported.
pub fn step_projectiles(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut Vec<Enemy>,
    world: &WorldBounds,
    range: f32,
    time_scale: f32,
) -> Vec<Kill> {
    let mut kills = Vec::new();

    projectiles.retain_mut(|projectile| {
        let delta = projectile.vel * time_scale;
        projectile.pos += delta;
        projectile.distance += delta.length();

        if !world.contains(projectile.pos) || projectile.distance > range {
            return false;
        }

        let rect = projectile.rect();
        let Some(index) = enemies.iter().position(|e| rect.overlaps(&e.rect())) else {
            return true;
        };

        let enemy = &mut enemies[index];
        enemy.health -= projectile.damage;
        if enemy.health <= 0.0 {
            let enemy = enemies.remove(index);
            kills.push(Kill {
                id: enemy.id,
                pos: enemy.center(),
            });
        }
        false
    });

    kills
}
