//! Levels, kill thresholds and the upgrade catalog
//!
//! Each level needs a fixed number of kills, taken from a piecewise table.
//! Levelling up grants flat stat bonuses immediately plus one upgrade credit;
//! credits are spent later from the catalog via hotkeys or the upgrade panel.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Notice, WeaponSettings};
use crate::{growth_multiplier, scale_floor};
use crate::tuning::UpgradeTuning;

/// Kills needed to advance from `level` to `level + 1`
pub fn kills_required(level: u32) -> u32 {
    match level {
        0..=1 => 1,
        2..=5 => 2,
        6..=10 => 3 + (level - 5) / 2,
        11..=20 => 6 + (level - 10) / 2,
        _ => 11 + (level - 20),
    }
}

/// Level counter and upgrade credits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level, starts at 1 and only goes up
    pub level: u32,
    /// Kills since the last level-up
    pub kills: u32,
    /// Kills needed to leave the current level
    pub kills_required: u32,
    /// Unspent upgrade credits
    pub credits: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            level: 1,
            kills: 0,
            kills_required: kills_required(1),
            credits: 0,
        }
    }

    /// Count a kill; returns true when it completes the level
    pub fn on_kill(&mut self) -> bool {
        self.kills += 1;
        if self.kills >= self.kills_required {
            self.level += 1;
            self.kills = 0;
            self.kills_required = kills_required(self.level);
            self.credits += 1;
            true
        } else {
            false
        }
    }

    /// Kills still missing for the next level
    pub fn kills_remaining(&self) -> u32 {
        self.kills_required.saturating_sub(self.kills)
    }

    /// Progress through the current level, 0-1
    pub fn progress(&self) -> f32 {
        if self.kills_required == 0 {
            return 0.0;
        }
        self.kills as f32 / self.kills_required as f32
    }

    /// Use up one credit if there is one
    pub fn spend_credit(&mut self) -> bool {
        if self.credits > 0 {
            self.credits -= 1;
            true
        } else {
            false
        }
    }
}

/// Stats an upgrade can touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapon: WeaponSettings,
    pub life_steal: f32,
}

/// The upgrade catalog, in hotkey order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    AttackSpeed,
    AttackDamage,
    LifeSteal,
    MultiShot,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::AttackSpeed,
        Upgrade::AttackDamage,
        Upgrade::LifeSteal,
        Upgrade::MultiShot,
    ];

    /// Catalog entry for a 0-based index
    pub fn from_index(index: usize) -> Option<Upgrade> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Upgrade::AttackSpeed => "Attack Speed",
            Upgrade::AttackDamage => "Attack Damage",
            Upgrade::LifeSteal => "Life Steal",
            Upgrade::MultiShot => "Multi-Shot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Upgrade::AttackSpeed => "Decrease antibody cooldown by 15%",
            Upgrade::AttackDamage => "Increase antibody damage by 30%",
            Upgrade::LifeSteal => "Gain health for each pathogen destroyed",
            Upgrade::MultiShot => "Add an additional antibody stream",
        }
    }

    /// Glyph shown on the upgrade panel
    pub fn icon(&self) -> &'static str {
        match self {
            Upgrade::AttackSpeed => "\u{26a1}",
            Upgrade::AttackDamage => "\u{1f4a5}",
            Upgrade::LifeSteal => "\u{2764}\u{fe0f}",
            Upgrade::MultiShot => "\u{1f52b}",
        }
    }

    pub fn hotkey(&self) -> char {
        match self {
            Upgrade::AttackSpeed => '1',
            Upgrade::AttackDamage => '2',
            Upgrade::LifeSteal => '3',
            Upgrade::MultiShot => '4',
        }
    }

    /// The loadout after taking this upgrade
    pub fn apply(self, loadout: Loadout, tuning: &UpgradeTuning) -> Loadout {
        let Loadout {
            mut weapon,
            mut life_steal,
        } = loadout;
        match self {
            Upgrade::AttackSpeed => {
                let faster = scale_floor(weapon.cooldown as f32, tuning.cooldown_factor) as u32;
                weapon.cooldown = faster.max(tuning.min_cooldown);
            }
            Upgrade::AttackDamage => {
                weapon.damage = scale_floor(weapon.damage, tuning.damage_factor);
            }
            Upgrade::LifeSteal => {
                life_steal += tuning.life_steal_per_pick;
            }
            Upgrade::MultiShot => {
                weapon.streams += tuning.streams_per_pick;
            }
        }
        Loadout { weapon, life_steal }
    }

    /// Feedback line describing the new stat
    pub fn result_text(&self, loadout: &Loadout) -> String {
        match self {
            Upgrade::AttackSpeed => format!(
                "Attack speed increased! Cooldown: {}",
                loadout.weapon.cooldown
            ),
            Upgrade::AttackDamage => format!("Damage increased to {}!", loadout.weapon.damage),
            Upgrade::LifeSteal => format!(
                "Life steal increased to {} health per kill!",
                loadout.life_steal
            ),
            Upgrade::MultiShot => format!(
                "Multi-Shot! Now firing {} antibody streams!",
                loadout.weapon.streams
            ),
        }
    }
}

/// Grant the flat rewards and difficulty bump for the level just reached
pub fn apply_level_up(state: &mut GameState) {
    let level = state.progression.level;
    let world = state.world();
    let tuning = &state.tuning;
    let rewards = &tuning.progression;

    let player = &mut state.player;
    player.raise_max_health(rewards.max_health_bonus);
    player.heal(rewards.level_up_heal);
    player.speed += rewards.speed_bonus;

    // Player and projectiles grow together, capped at the multiplier limit
    let growth = growth_multiplier(
        level,
        rewards.size_growth_per_level,
        rewards.max_size_multiplier,
    );
    player.size = glam::Vec2::splat(scale_floor(tuning.player.size, growth));
    player.pos = world.clamp_pos(player.pos, player.size);
    state.weapon.width = scale_floor(tuning.weapon.width, growth);
    state.weapon.height = scale_floor(tuning.weapon.height, growth);

    state.horde.speed += rewards.enemy_speed_increment(level);

    let notice_frames = tuning.notices.level_banner;
    state.notices.level_banner = Some(Notice::new(
        format!("LEVEL UP! Level {}", level),
        notice_frames,
    ));
    state
        .notices
        .show_message("Upgrade available! Press 1-4 to select or click the icons", 180);
    state.events.push(GameEvent::LevelUp { level });

    log::info!(
        "Level up -> {} (next in {} kills, enemy speed {:.2}, size x{:.2})",
        level,
        state.progression.kills_required,
        state.horde.speed,
        growth
    );
}

/// Spend a credit on catalog entry `index`; ignored without a credit or for
/// an index outside the catalog
pub fn select_upgrade(state: &mut GameState, index: usize) -> Option<Upgrade> {
    let Some(upgrade) = Upgrade::from_index(index) else {
        log::debug!("Ignoring upgrade index {} outside the catalog", index);
        return None;
    };
    if !state.progression.spend_credit() {
        log::debug!("Ignoring {} upgrade: no credits", upgrade.name());
        return None;
    }

    let loadout = Loadout {
        weapon: state.weapon.clone(),
        life_steal: state.player.life_steal,
    };
    let upgraded = upgrade.apply(loadout, &state.tuning.upgrades);
    let text = upgrade.result_text(&upgraded);
    state.weapon = upgraded.weapon;
    state.player.life_steal = upgraded.life_steal;

    state.notices.upgrade_result = Some(Notice::new(
        text.clone(),
        state.tuning.notices.upgrade_result,
    ));
    state.notices.show_message(text, 120);
    state.events.push(GameEvent::UpgradeApplied { upgrade });
    log::info!(
        "Upgrade taken: {} ({} credits left)",
        upgrade.name(),
        state.progression.credits
    );

    Some(upgrade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::tuning::{Tuning, WeaponTuning};
    use glam::Vec2;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(1, Tuning::default(), Settings::default(), Vec2::new(1280.0, 720.0))
    }

    fn base_loadout() -> Loadout {
        Loadout {
            weapon: WeaponSettings::from(&WeaponTuning::default()),
            life_steal: 0.0,
        }
    }

    #[test]
    fn test_threshold_table() {
        assert_eq!(kills_required(1), 1);
        assert_eq!(kills_required(2), 2);
        assert_eq!(kills_required(5), 2);
        assert_eq!(kills_required(6), 3);
        assert_eq!(kills_required(7), 4);
        assert_eq!(kills_required(10), 5);
        assert_eq!(kills_required(11), 6);
        assert_eq!(kills_required(20), 11);
        assert_eq!(kills_required(21), 12);
        assert_eq!(kills_required(30), 21);
    }

    #[test]
    fn test_first_kill_levels_up() {
        let mut p = Progression::new();
        assert!(p.on_kill());
        assert_eq!(p.level, 2);
        assert_eq!(p.kills, 0);
        assert_eq!(p.kills_required, 2);
        assert_eq!(p.credits, 1);
    }

    #[test]
    fn test_single_kill_advances_at_most_one_level() {
        let mut p = Progression::new();
        p.on_kill();
        assert!(!p.on_kill());
        assert_eq!(p.level, 2);
        assert_eq!(p.kills, 1);
        assert!(p.on_kill());
        assert_eq!(p.level, 3);
        assert_eq!(p.kills, 0);
    }

    #[test]
    fn test_attack_speed_has_floor() {
        let tuning = UpgradeTuning::default();
        let mut loadout = base_loadout();
        loadout = Upgrade::AttackSpeed.apply(loadout, &tuning);
        assert_eq!(loadout.weapon.cooldown, 12);
        for _ in 0..20 {
            loadout = Upgrade::AttackSpeed.apply(loadout, &tuning);
        }
        assert_eq!(loadout.weapon.cooldown, 5);
    }

    #[test]
    fn test_damage_and_streams_and_life_steal() {
        let tuning = UpgradeTuning::default();
        let loadout = Upgrade::AttackDamage.apply(base_loadout(), &tuning);
        assert_eq!(loadout.weapon.damage, 13.0);
        let loadout = Upgrade::MultiShot.apply(loadout, &tuning);
        assert_eq!(loadout.weapon.streams, 2);
        let loadout = Upgrade::LifeSteal.apply(loadout, &tuning);
        assert_eq!(loadout.life_steal, 2.0);
        assert_eq!(loadout.weapon.damage, 13.0);
    }

    #[test]
    fn test_level_up_rewards() {
        let mut state = new_state();
        state.player.health = 50.0;
        assert!(state.progression.on_kill());
        apply_level_up(&mut state);
        assert_eq!(state.player.max_health, 110.0);
        assert_eq!(state.player.health, 70.0);
        assert!((state.player.speed - 5.2).abs() < 1e-5);
        // Level 2: 5% growth
        assert_eq!(state.player.size, Vec2::splat(42.0));
        assert_eq!(state.weapon.width, 10.0);
        assert!((state.horde.speed - 2.1).abs() < 1e-5);
        assert!(state.notices.level_banner.is_some());
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_level_up_heal_capped() {
        let mut state = new_state();
        state.progression.on_kill();
        apply_level_up(&mut state);
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_size_growth_caps_at_double() {
        let mut state = new_state();
        state.progression.level = 60;
        apply_level_up(&mut state);
        assert_eq!(state.player.size, Vec2::splat(80.0));
        assert_eq!(state.weapon.width, 20.0);
        assert_eq!(state.weapon.height, 10.0);
    }

    #[test]
    fn test_catalog_labels() {
        for (i, upgrade) in Upgrade::ALL.iter().enumerate() {
            assert_eq!(Upgrade::from_index(i), Some(*upgrade));
            assert_eq!(upgrade.hotkey().to_digit(10), Some(i as u32 + 1));
            assert!(!upgrade.description().is_empty());
        }
        assert_eq!(Upgrade::from_index(4), None);
        assert!(Upgrade::LifeSteal.description().contains("pathogen"));
    }

    #[test]
    fn test_select_upgrade_requires_credit() {
        let mut state = new_state();
        assert_eq!(select_upgrade(&mut state, 0), None);
        assert_eq!(state.weapon.cooldown, 15);

        state.progression.credits = 1;
        assert_eq!(select_upgrade(&mut state, 7), None);
        assert_eq!(state.progression.credits, 1);

        assert_eq!(select_upgrade(&mut state, 2), Some(Upgrade::LifeSteal));
        assert_eq!(state.player.life_steal, 2.0);
        assert_eq!(state.progression.credits, 0);
        assert!(state.notices.upgrade_result.is_some());
    }

    proptest! {
        #[test]
        fn prop_threshold_non_decreasing(level in 1u32..500) {
            prop_assert!(kills_required(level + 1) >= kills_required(level));
            prop_assert!(kills_required(level) >= 1);
        }

        #[test]
        fn prop_each_kill_adds_at_most_one_level(kills in 1usize..300) {
            let mut p = Progression::new();
            for _ in 0..kills {
                let before = p.level;
                let leveled = p.on_kill();
                prop_assert_eq!(p.level, before + leveled as u32);
                prop_assert!(p.kills < p.kills_required);
            }
        }
    }
}
