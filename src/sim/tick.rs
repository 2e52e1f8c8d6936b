//! Per-frame simulation step
//!
//! One call to `tick` is one logical frame. Commands are applied first, then
//! (while playing) the player, projectiles, spawner and enemies advance in
//! that order. The camera and notice timers update in every phase.

use glam::Vec2;

use super::enemies::{step_enemies, try_spawn};
use super::geometry::Facing;
use super::input::{Command, TickInput};
use super::progression::{apply_level_up, select_upgrade};
use super::projectiles::{Kill, fire, pointer_direction, step_projectiles};
use super::state::{GameEvent, GamePhase, GameState};
use crate::settings::AimMode;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    let mut manual_fire = false;
    for &command in &input.commands {
        apply_command(state, command, &mut manual_fire);
    }

    if state.phase == GamePhase::Playing {
        state.frame += 1;

        update_player(state, input, manual_fire);

        let world = state.world();
        let time_scale = state.time_scale();
        let range = state.weapon.range;
        let kills = step_projectiles(
            &mut state.projectiles,
            &mut state.enemies,
            &world,
            range,
            time_scale,
        );
        credit_kills(state, &kills);

        try_spawn(state);
        step_enemies(state);
    }

    // Re-derived every frame so a resize while paused still frames the player
    let world = state.world();
    let player = state.player.rect();
    state.camera.follow(&player, &world);

    let pulse_period = state.tuning.notices.pulse_period;
    state.notices.tick(pulse_period);
}

fn apply_command(state: &mut GameState, command: Command, manual_fire: &mut bool) {
    match command {
        Command::Fire => *manual_fire = true,
        Command::ToggleAutoFire => {
            if state.phase == GamePhase::GameOver {
                return;
            }
            let enabled = state.player.toggle_auto_fire();
            let text = if enabled {
                "Auto-fire enabled"
            } else {
                "Auto-fire disabled"
            };
            state.notices.show_message(text, 120);
            log::debug!("{}", text);
        }
        Command::ToggleGameSpeed => {
            let speed = state.settings.toggle_game_speed();
            state
                .notices
                .show_message(format!("Game speed: {}", speed.as_str()), 120);
            log::info!("Game speed set to {}", speed.percent());
        }
        Command::SelectUpgrade(index) => {
            if state.phase == GamePhase::Playing {
                select_upgrade(state, index);
            } else {
                log::debug!("Ignoring upgrade selection while {:?}", state.phase);
            }
        }
        Command::Pause => {
            if state.phase == GamePhase::Playing {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused at frame {}", state.frame);
            }
        }
        Command::TogglePause => match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused at frame {}", state.frame);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        },
        Command::Restart => {
            if state.phase == GamePhase::GameOver {
                state.restart();
                state.events.push(GameEvent::Restarted);
                log::info!("Game restarted (seed {})", state.seed);
            } else {
                log::debug!("Ignoring restart while {:?}", state.phase);
            }
        }
    }
}

/// Cooldowns, aiming, firing and movement for one frame
fn update_player(state: &mut GameState, input: &TickInput, manual_fire: bool) {
    let player = &mut state.player;
    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);

    let aim = match state.settings.aim {
        AimMode::Pointer => input.pointer.and_then(|pointer| {
            pointer_direction(
                player.center(),
                &state.camera,
                pointer,
                state.tuning.weapon.aim_dead_zone,
            )
        }),
        AimMode::Facing => None,
    };
    if let Some(dir) = aim {
        player.facing = Facing::from_vector(dir);
    }

    if player.auto_fire || manual_fire {
        fire(state, aim);
    }

    let step = state.player.speed * state.time_scale();
    let held = input.held;
    let player = &mut state.player;
    let mut delta = Vec2::ZERO;
    if held.right {
        delta.x += step;
        player.facing = Facing::Right;
    }
    if held.left {
        delta.x -= step;
        player.facing = Facing::Left;
    }
    if held.up {
        delta.y -= step;
        player.facing = Facing::Up;
    }
    if held.down {
        delta.y += step;
        player.facing = Facing::Down;
    }

    let world = state.world();
    let player = &mut state.player;
    player.pos = world.clamp_pos(player.pos + delta, player.size);
}

/// Score, life steal and progression for enemies killed this frame
fn credit_kills(state: &mut GameState, kills: &[Kill]) {
    for kill in kills {
        if state.player.life_steal > 0.0 {
            state.player.heal(state.player.life_steal);
        }
        state.score += state.tuning.progression.score_per_kill * state.progression.level as u64;
        state.events.push(GameEvent::EnemyKilled {
            id: kill.id,
            pos: kill.pos,
        });
        if state.progression.on_kill() {
            apply_level_up(state);
        }
    }
}
