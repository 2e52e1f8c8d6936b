//! Data-driven game balance
//!
//! Every number that shapes how the game plays lives here. Defaults match the
//! shipped balance; a host may override any subset from JSON.

use anyhow::{Context, bail, ensure};
use serde::{Deserialize, Serialize};

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub horde: HordeTuning,
    pub progression: ProgressionTuning,
    pub upgrades: UpgradeTuning,
    pub notices: NoticeTuning,
}

/// World extents (origin at top-left, y grows downward)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 3000.0,
        }
    }
}

/// Player base stats (restored on restart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Side length of the square player hitbox
    pub size: f32,
    /// Pixels per frame along each held axis
    pub speed: f32,
    pub health: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 40.0,
            speed: 5.0,
            health: 100.0,
        }
    }
}

/// Base weapon settings (restored on restart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub width: f32,
    pub height: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Frames between shots
    pub cooldown: u32,
    /// Maximum travel distance before a projectile fizzles
    pub range: f32,
    pub damage: f32,
    pub streams: u32,
    /// Screen-space radius around the player where the pointer gives no direction
    pub aim_dead_zone: f32,
    /// Perpendicular offset per extra stream when firing at the pointer
    pub spread: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 5.0,
            speed: 15.0,
            cooldown: 15,
            range: 500.0,
            damage: 10.0,
            streams: 1,
            aim_dead_zone: 10.0,
            spread: 0.3,
        }
    }
}

/// Enemy spawning, movement and contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HordeTuning {
    pub min_size: u32,
    pub max_size: u32,
    /// Starting chase speed, raised on every level-up
    pub speed: f32,
    /// Frames between spawns at level 0
    pub spawn_interval: u32,
    /// Floor for the level-adjusted spawn interval
    pub min_spawn_interval: u32,
    /// Frames shaved off the spawn interval per level
    pub interval_decay_per_level: u32,
    pub max_population: usize,
    pub base_health: f32,
    pub health_per_level: f32,
    /// Contact damage is `contact_damage + floor(level / contact_damage_divisor)`
    pub contact_damage: f32,
    pub contact_damage_divisor: u32,
    /// Fraction of the enemy-to-player offset applied as push-back on contact
    pub knockback: f32,
    /// Maximum random wobble added to each movement axis per frame
    pub jitter: f32,
    /// Frames of invulnerability after a contact hit (0 = hit every overlapping frame)
    pub contact_cooldown: u32,
}

impl Default for HordeTuning {
    fn default() -> Self {
        Self {
            min_size: 30,
            max_size: 50,
            speed: 2.0,
            spawn_interval: 120,
            min_spawn_interval: 30,
            interval_decay_per_level: 5,
            max_population: 20,
            base_health: 20.0,
            health_per_level: 5.0,
            contact_damage: 1.0,
            contact_damage_divisor: 3,
            knockback: 0.1,
            jitter: 0.0,
            contact_cooldown: 0,
        }
    }
}

/// Rewards and difficulty bumps granted on level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub size_growth_per_level: f32,
    pub max_size_multiplier: f32,
    pub max_health_bonus: f32,
    pub level_up_heal: f32,
    pub speed_bonus: f32,
    /// `(up_to_level, increment)` pairs, ascending; enemy speed bump for the new level
    pub enemy_speed_steps: Vec<(u32, f32)>,
    /// Enemy speed bump past the last step
    pub enemy_speed_step_late: f32,
    /// Score per kill is this times the current level
    pub score_per_kill: u64,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            size_growth_per_level: 0.05,
            max_size_multiplier: 2.0,
            max_health_bonus: 10.0,
            level_up_heal: 20.0,
            speed_bonus: 0.2,
            enemy_speed_steps: vec![(5, 0.1), (10, 0.08), (15, 0.05), (20, 0.03)],
            enemy_speed_step_late: 0.02,
            score_per_kill: 10,
        }
    }
}

impl ProgressionTuning {
    /// Enemy speed increment for reaching `level`
    pub fn enemy_speed_increment(&self, level: u32) -> f32 {
        self.enemy_speed_steps
            .iter()
            .find(|(up_to, _)| level <= *up_to)
            .map(|(_, inc)| *inc)
            .unwrap_or(self.enemy_speed_step_late)
    }
}

/// Effect sizes of the upgrade catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTuning {
    pub cooldown_factor: f32,
    pub min_cooldown: u32,
    pub damage_factor: f32,
    pub life_steal_per_pick: f32,
    pub streams_per_pick: u32,
}

impl Default for UpgradeTuning {
    fn default() -> Self {
        Self {
            cooldown_factor: 0.85,
            min_cooldown: 5,
            damage_factor: 1.3,
            life_steal_per_pick: 2.0,
            streams_per_pick: 1,
        }
    }
}

/// On-screen notice timings, in frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeTuning {
    pub level_banner: u32,
    pub upgrade_result: u32,
    pub message_fade: u32,
    pub banner_fade: u32,
    pub pulse_period: u32,
}

impl Default for NoticeTuning {
    fn default() -> Self {
        Self {
            level_banner: 120,
            upgrade_result: 180,
            message_fade: 30,
            banner_fade: 60,
            pulse_period: 60,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance sheet and validate it
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate().context("invalid tuning")?;
        Ok(tuning)
    }

    /// Reject balance sheets the simulation can't run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        ensure!(
            w.width > 0.0 && w.height > 0.0,
            "world must have a positive size, got {}x{}",
            w.width,
            w.height
        );

        let p = &self.player;
        ensure!(p.size > 0.0, "player size must be positive");
        ensure!(
            p.size * self.progression.max_size_multiplier <= w.width.min(w.height),
            "fully grown player ({} px) doesn't fit in the world",
            p.size * self.progression.max_size_multiplier
        );
        ensure!(p.health > 0.0, "player health must be positive");

        let wp = &self.weapon;
        ensure!(wp.range > 0.0, "weapon range must be positive");
        ensure!(wp.speed > 0.0, "weapon speed must be positive");
        ensure!(wp.streams >= 1, "weapon needs at least one stream");

        let h = &self.horde;
        if h.min_size == 0 || h.min_size > h.max_size {
            bail!(
                "enemy size range {}..={} is empty or degenerate",
                h.min_size,
                h.max_size
            );
        }
        ensure!(h.min_spawn_interval >= 1, "spawn interval floor must be at least one frame");
        ensure!(
            h.spawn_interval >= h.min_spawn_interval,
            "spawn interval {} is below its floor {}",
            h.spawn_interval,
            h.min_spawn_interval
        );
        ensure!(h.contact_damage_divisor >= 1, "contact damage divisor must be at least 1");
        ensure!(h.jitter >= 0.0, "jitter can't be negative");

        let pr = &self.progression;
        ensure!(pr.max_size_multiplier >= 1.0, "size multiplier cap must be at least 1");
        ensure!(
            pr.enemy_speed_steps.windows(2).all(|s| s[0].0 < s[1].0),
            "enemy speed steps must be sorted by level"
        );

        let u = &self.upgrades;
        ensure!(
            u.cooldown_factor > 0.0 && u.cooldown_factor <= 1.0,
            "cooldown factor must be in (0, 1]"
        );
        ensure!(u.damage_factor >= 1.0, "damage factor must not shrink damage");

        ensure!(self.notices.pulse_period >= 1, "pulse period must be at least one frame");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "weapon": { "damage": 25.0 }, "horde": { "jitter": 0.5 } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.weapon.damage, 25.0);
        assert_eq!(tuning.weapon.cooldown, 15);
        assert_eq!(tuning.horde.jitter, 0.5);
        assert_eq!(tuning.horde.max_population, 20);
        assert_eq!(tuning.world, WorldTuning::default());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Tuning::from_json("{ not json").is_err());
        assert!(Tuning::from_json(r#"{ "world": { "width": 0.0 } }"#).is_err());
        assert!(Tuning::from_json(r#"{ "horde": { "min_size": 60, "max_size": 50 } }"#).is_err());
        assert!(Tuning::from_json(r#"{ "upgrades": { "cooldown_factor": 1.5 } }"#).is_err());
    }

    #[test]
    fn test_enemy_speed_increment_table() {
        let p = ProgressionTuning::default();
        assert_eq!(p.enemy_speed_increment(2), 0.1);
        assert_eq!(p.enemy_speed_increment(5), 0.1);
        assert_eq!(p.enemy_speed_increment(6), 0.08);
        assert_eq!(p.enemy_speed_increment(15), 0.05);
        assert_eq!(p.enemy_speed_increment(20), 0.03);
        assert_eq!(p.enemy_speed_increment(21), 0.02);
    }
}
