//! Player-facing toggles
//!
//! Unlike the balance sheet in `tuning`, these are flipped at runtime by
//! hotkeys and survive a restart.

use serde::{Deserialize, Serialize};

/// Global time scale applied to every movement delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameSpeed {
    /// 50% speed
    #[default]
    Half,
    Normal,
}

impl GameSpeed {
    pub fn multiplier(&self) -> f32 {
        match self {
            GameSpeed::Half => 0.5,
            GameSpeed::Normal => 1.0,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            GameSpeed::Half => GameSpeed::Normal,
            GameSpeed::Normal => GameSpeed::Half,
        }
    }

    pub fn percent(&self) -> &'static str {
        match self {
            GameSpeed::Half => "50%",
            GameSpeed::Normal => "100%",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameSpeed::Half => "50% (slower)",
            GameSpeed::Normal => "100% (normal)",
        }
    }
}

/// How shots pick their direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AimMode {
    /// Toward the mouse/touch point, fanned around it for multi-shot
    #[default]
    Pointer,
    /// Along the facing direction, extra streams cycle the cardinal directions
    Facing,
}

impl AimMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pointer" | "mouse" => Some(AimMode::Pointer),
            "facing" | "cardinal" => Some(AimMode::Facing),
            _ => None,
        }
    }
}

/// Runtime toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub game_speed: GameSpeed,
    pub aim: AimMode,
}

impl Settings {
    /// Effective movement multiplier
    pub fn time_scale(&self) -> f32 {
        self.game_speed.multiplier()
    }

    /// Flip between half and normal speed, returning the new speed
    pub fn toggle_game_speed(&mut self) -> GameSpeed {
        self.game_speed = self.game_speed.toggled();
        self.game_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_half_speed_pointer_aim() {
        let settings = Settings::default();
        assert_eq!(settings.time_scale(), 0.5);
        assert_eq!(settings.aim, AimMode::Pointer);
    }

    #[test]
    fn test_toggle_game_speed() {
        let mut settings = Settings::default();
        assert_eq!(settings.toggle_game_speed(), GameSpeed::Normal);
        assert_eq!(settings.time_scale(), 1.0);
        assert_eq!(settings.toggle_game_speed(), GameSpeed::Half);
    }

    #[test]
    fn test_aim_mode_from_str() {
        assert_eq!(AimMode::from_str("Mouse"), Some(AimMode::Pointer));
        assert_eq!(AimMode::from_str("facing"), Some(AimMode::Facing));
        assert_eq!(AimMode::from_str("joystick"), None);
    }
}
