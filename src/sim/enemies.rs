//! Pathogen spawning, pursuit and contact damage

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, WorldBounds};
use super::state::{Enemy, GameEvent, GamePhase, GameState};
use crate::direction_between;
use crate::tuning::HordeTuning;

/// Frames between spawns at `level`
pub fn spawn_interval(level: u32, tuning: &HordeTuning) -> u32 {
    tuning
        .spawn_interval
        .saturating_sub(level.saturating_mul(tuning.interval_decay_per_level))
        .max(tuning.min_spawn_interval)
}

/// Health of an enemy spawned at `level`
pub fn enemy_health(level: u32, tuning: &HordeTuning) -> f32 {
    tuning.base_health + level.saturating_sub(1) as f32 * tuning.health_per_level
}

/// Damage per contact for an enemy spawned at `level`
pub fn contact_damage(level: u32, tuning: &HordeTuning) -> f32 {
    tuning.contact_damage + (level / tuning.contact_damage_divisor.max(1)) as f32
}

/// Viewport edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnSide {
    const ALL: [SpawnSide; 4] = [
        SpawnSide::Top,
        SpawnSide::Right,
        SpawnSide::Bottom,
        SpawnSide::Left,
    ];
}

/// Top-left for an enemy of `size` just beyond the `view` edge on `side`.
///
/// `along` (0-1) picks the position along that edge across the whole world.
fn spawn_position(
    side: SpawnSide,
    along: f32,
    size: Vec2,
    view: &Rect,
    world: &WorldBounds,
) -> Vec2 {
    let pos = match side {
        SpawnSide::Top => Vec2::new(along * world.width, (view.pos.y - size.y * 2.0).max(0.0)),
        SpawnSide::Right => Vec2::new(
            (view.max().x + size.x * 2.0).min(world.width),
            along * world.height,
        ),
        SpawnSide::Bottom => Vec2::new(
            along * world.width,
            (view.max().y + size.y * 2.0).min(world.height),
        ),
        SpawnSide::Left => Vec2::new((view.pos.x - size.x * 2.0).max(0.0), along * world.height),
    };
    world.clamp_pos(pos, size)
}

/// Count one frame toward the next spawn and spawn when it's due.
///
/// The counter restarts every time the interval elapses, even when the
/// population cap blocks the spawn. Returns the new enemy's ID.
pub fn try_spawn(state: &mut GameState) -> Option<u32> {
    let tuning = &state.tuning.horde;
    let level = state.progression.level;

    state.horde.spawn_counter += 1;
    if state.horde.spawn_counter < spawn_interval(level, tuning) {
        return None;
    }
    state.horde.spawn_counter = 0;

    if state.enemies.len() >= tuning.max_population {
        log::trace!(
            "Spawn skipped, population at cap ({})",
            tuning.max_population
        );
        return None;
    }

    let rng = &mut state.rng;
    let size = Vec2::new(
        rng.random_range(tuning.min_size..=tuning.max_size) as f32,
        rng.random_range(tuning.min_size..=tuning.max_size) as f32,
    );
    let side = SpawnSide::ALL[rng.random_range(0..SpawnSide::ALL.len())];
    let along: f32 = rng.random();
    let pos = spawn_position(
        side,
        along,
        size,
        &state.camera.view_rect(),
        &state.world(),
    );

    let health = enemy_health(level, tuning);
    let enemy = Enemy {
        id: 0,
        pos,
        size,
        speed: state.horde.speed,
        health,
        max_health: health,
        contact_damage: contact_damage(level, tuning),
    };
    let id = state.next_entity_id();
    state.enemies.push(Enemy { id, ..enemy });
    state.events.push(GameEvent::EnemySpawned { id });
    Some(id)
}

/// Move every enemy toward the player and resolve contact hits.
///
/// Stops at the first fatal hit and switches the game to `GameOver`.
pub fn step_enemies(state: &mut GameState) {
    let time_scale = state.time_scale();
    let world = state.world();
    let tuning = &state.tuning.horde;
    let player = &mut state.player;

    player.contact_cooldown = player.contact_cooldown.saturating_sub(1);

    for enemy in state.enemies.iter_mut() {
        if let Some(dir) = direction_between(enemy.center(), player.center()) {
            enemy.pos += dir * enemy.speed * time_scale;
        }
        if tuning.jitter > 0.0 {
            let jitter = Vec2::new(
                state.rng.random_range(-tuning.jitter..=tuning.jitter),
                state.rng.random_range(-tuning.jitter..=tuning.jitter),
            );
            enemy.pos += jitter * time_scale;
        }

        if player.contact_cooldown > 0 || !enemy.rect().overlaps(&player.rect()) {
            continue;
        }

        let fatal = player.take_damage(enemy.contact_damage);
        let push = (player.center() - enemy.center()) * tuning.knockback;
        player.pos = world.clamp_pos(player.pos + push, player.size);
        player.contact_cooldown = tuning.contact_cooldown;
        state.events.push(GameEvent::PlayerHit {
            damage: enemy.contact_damage,
        });

        if fatal {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver {
                score: state.score,
                level: state.progression.level,
            });
            log::info!(
                "Game over: score {}, level {}, frame {}",
                state.score,
                state.progression.level,
                state.frame
            );
            break;
        }
    }
}
