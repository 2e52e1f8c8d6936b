//! Whole-frame scenarios driven through the public API

use glam::Vec2;

use micro_defender::sim::{
    Command, Enemy, Facing, GameEvent, GamePhase, GameState, HeldKeys, Projectile, TickInput,
    Upgrade, fire, select_upgrade, step_projectiles, tick,
};
use micro_defender::{AimMode, GameSpeed, Settings, Tuning};

fn new_state(seed: u64) -> GameState {
    let settings = Settings {
        game_speed: GameSpeed::Normal,
        aim: AimMode::Facing,
    };
    GameState::new(seed, Tuning::default(), settings, Vec2::new(1280.0, 720.0))
}

fn enemy(id: u32, pos: Vec2, health: f32, contact_damage: f32) -> Enemy {
    Enemy {
        id,
        pos,
        size: Vec2::splat(40.0),
        speed: 0.0,
        health,
        max_health: health,
        contact_damage,
    }
}

/// Park a lethal enemy on the player and tick until the run ends
fn kill_player(state: &mut GameState) {
    state.enemies.push(enemy(900, state.player.pos, 1000.0, 1000.0));
    tick(state, &TickInput::idle());
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn projectile_travels_150_in_ten_steps() {
    let mut state = new_state(1);
    state.player.pos = Vec2::new(100.0, 100.0);
    state.player.facing = Facing::Right;

    assert_eq!(fire(&mut state, None), 1);
    assert_eq!(state.projectiles[0].vel, Vec2::new(15.0, 0.0));

    let world = state.world();
    let mut enemies = Vec::new();
    for _ in 0..10 {
        step_projectiles(&mut state.projectiles, &mut enemies, &world, 500.0, 1.0);
    }
    assert_eq!(state.projectiles.len(), 1);
    assert!((state.projectiles[0].distance - 150.0).abs() < 1e-3);
}

#[test]
fn enemy_dies_on_third_hit() {
    let world = micro_defender::sim::WorldBounds::new(3000.0, 3000.0);
    let mut enemies = vec![enemy(5, Vec2::new(500.0, 500.0), 30.0, 1.0)];
    let shot = |id| Projectile {
        id,
        pos: Vec2::new(480.0, 510.0),
        size: Vec2::new(10.0, 5.0),
        vel: Vec2::new(15.0, 0.0),
        facing: Facing::Right,
        distance: 0.0,
        damage: 10.0,
    };

    let mut projectiles = vec![shot(1)];
    assert!(step_projectiles(&mut projectiles, &mut enemies, &world, 500.0, 1.0).is_empty());
    assert_eq!(enemies[0].health, 20.0);

    projectiles.push(shot(2));
    assert!(step_projectiles(&mut projectiles, &mut enemies, &world, 500.0, 1.0).is_empty());
    assert_eq!(enemies[0].health, 10.0);

    projectiles.push(shot(3));
    let kills = step_projectiles(&mut projectiles, &mut enemies, &world, 500.0, 1.0);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].id, 5);
    assert!(enemies.is_empty());
    assert!(projectiles.is_empty());
}

#[test]
fn damage_upgrade_spares_projectiles_in_flight() {
    let mut state = new_state(6);
    state.player.facing = Facing::Right;
    assert_eq!(fire(&mut state, None), 1);

    state.progression.credits = 1;
    assert_eq!(select_upgrade(&mut state, 1), Some(Upgrade::AttackDamage));
    assert_eq!(state.weapon.damage, 13.0);

    let world = state.world();
    let target = state.player.pos + Vec2::new(60.0, 0.0);
    let mut enemies = vec![enemy(7, target, 30.0, 1.0)];
    step_projectiles(&mut state.projectiles, &mut enemies, &world, 500.0, 1.0);
    assert!(state.projectiles.is_empty());
    assert_eq!(enemies[0].health, 20.0);

    // Shots fired after the upgrade carry the new damage
    state.player.fire_cooldown = 0;
    fire(&mut state, None);
    assert_eq!(state.projectiles[0].damage, 13.0);
}

#[test]
fn contact_death_ends_run_and_freezes_world() {
    let mut state = new_state(2);
    state.score = 30;
    kill_player(&mut state);

    assert!(state.events.contains(&GameEvent::GameOver { score: 30, level: 1 }));
    assert_eq!(state.player.health, 0.0);

    let frame = state.frame;
    let pos = state.player.pos;
    let mut input = TickInput::idle();
    input.held.left = true;
    for _ in 0..10 {
        tick(&mut state, &input);
    }
    assert_eq!(state.frame, frame);
    assert_eq!(state.player.pos, pos);
}

#[test]
fn restart_resets_run_but_keeps_settings() {
    let mut state = new_state(3);
    tick(
        &mut state,
        &TickInput::idle().with_command(Command::ToggleGameSpeed),
    );
    assert_eq!(state.settings.game_speed, GameSpeed::Half);

    state.score = 120;
    state.progression.level = 4;
    state.progression.credits = 2;
    kill_player(&mut state);

    state.restart();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.progression.level, 1);
    assert_eq!(state.progression.credits, 0);
    assert!(state.enemies.is_empty());
    assert!(state.projectiles.is_empty());
    assert_eq!(state.player.health, state.player.max_health);
    assert_eq!(state.settings.game_speed, GameSpeed::Half);
}

#[test]
fn restart_key_only_works_after_game_over() {
    let mut state = new_state(4);
    state.score = 50;
    tick(&mut state, &TickInput::idle().with_command(Command::Restart));
    assert_eq!(state.score, 50);

    kill_player(&mut state);
    tick(&mut state, &TickInput::idle().with_command(Command::Restart));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert!(state.enemies.is_empty());
    assert!(state.events.contains(&GameEvent::Restarted));
}

#[test]
fn single_kill_advances_at_most_one_level() {
    let mut state = new_state(5);
    let target = state.player.pos + Vec2::new(60.0, 0.0);
    state.enemies.push(enemy(1, target, 5.0, 1.0));
    state.enemies.push(enemy(2, target + Vec2::new(0.0, 300.0), 5.0, 1.0));

    tick(&mut state, &TickInput::idle());
    assert_eq!(state.progression.level, 2);
    assert_eq!(state.progression.kills, 0);
    assert_eq!(state.enemies.len(), 1);
}

/// Scripted movement pattern used by the long-run tests
fn patrol(frame: u64) -> TickInput {
    let mut input = TickInput::idle();
    input.held = match (frame / 120) % 4 {
        0 => HeldKeys {
            right: true,
            ..HeldKeys::default()
        },
        1 => HeldKeys {
            down: true,
            ..HeldKeys::default()
        },
        2 => HeldKeys {
            left: true,
            ..HeldKeys::default()
        },
        _ => HeldKeys {
            up: true,
            ..HeldKeys::default()
        },
    };
    input
}

#[test]
fn long_run_keeps_invariants() {
    let mut state = new_state(77);
    let cap = state.tuning.horde.max_population;
    let range = state.weapon.range;

    for _ in 0..5000 {
        if state.is_over() {
            break;
        }
        let mut input = patrol(state.frame);
        if state.progression.credits > 0 {
            input = input.with_command(Command::SelectUpgrade(3));
        }
        tick(&mut state, &input);

        assert!(state.player.health <= state.player.max_health);
        assert!(state.enemies.len() <= cap);
        for e in &state.enemies {
            assert!(e.health > 0.0 && e.health <= e.max_health);
        }
        for p in &state.projectiles {
            assert!(p.distance <= range);
        }
        let world = state.world();
        let player = state.player.rect();
        assert!(player.pos.x >= 0.0 && player.max().x <= world.width);
        assert!(player.pos.y >= 0.0 && player.max().y <= world.height);
    }
    assert!(state.frame > 0);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut state = new_state(seed);
        for _ in 0..2000 {
            let input = patrol(state.frame);
            tick(&mut state, &input);
        }
        (
            state.frame,
            state.score,
            state.progression.level,
            state.player.pos,
            state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
        )
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn partial_tuning_json_keeps_defaults() {
    let tuning = Tuning::from_json(r#"{ "horde": { "max_population": 5 } }"#)
        .expect("valid tuning");
    assert_eq!(tuning.horde.max_population, 5);
    assert_eq!(tuning.horde.spawn_interval, 120);
    assert_eq!(tuning.weapon.range, 500.0);

    let mut state = GameState::new(
        1,
        tuning,
        Settings::default(),
        Vec2::new(1280.0, 720.0),
    );
    for _ in 0..2000 {
        tick(&mut state, &TickInput::idle());
        assert!(state.enemies.len() <= 5);
    }
}

#[test]
fn bad_tuning_is_rejected() {
    assert!(Tuning::from_json(r#"{ "world": { "width": 0 } }"#).is_err());
    assert!(Tuning::from_json("not json").is_err());
}
