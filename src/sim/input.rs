//! Input intents
//!
//! Browser callbacks never touch `GameState`. They record key state and
//! queue commands here; the game loop drains the queue once per frame into a
//! `TickInput`, so every mutation happens inside `tick`.

use glam::Vec2;

/// One-shot commands triggered by a key press or click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fire once (manual fire)
    Fire,
    ToggleAutoFire,
    ToggleGameSpeed,
    /// Spend a credit on the catalog entry at this index
    SelectUpgrade(usize),
    TogglePause,
    /// Pause if playing, otherwise nothing (focus loss)
    Pause,
    /// Start over (only honoured after game over)
    Restart,
}

impl Command {
    /// Command bound to a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Command> {
        match key {
            " " => Some(Command::Fire),
            "f" | "F" => Some(Command::ToggleAutoFire),
            "g" | "G" => Some(Command::ToggleGameSpeed),
            "1" => Some(Command::SelectUpgrade(0)),
            "2" => Some(Command::SelectUpgrade(1)),
            "3" => Some(Command::SelectUpgrade(2)),
            "4" => Some(Command::SelectUpgrade(3)),
            "Escape" => Some(Command::TogglePause),
            "r" | "R" => Some(Command::Restart),
            _ => None,
        }
    }
}

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Record a movement key change; returns false for non-movement keys
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HeldKeys,
    /// Pointer or touch position in screen pixels, if known
    pub pointer: Option<Vec2>,
    /// Commands in the order they were issued
    pub commands: Vec<Command>,
}

impl TickInput {
    /// Input with nothing pressed and no pointer
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

/// Accumulates host events between frames
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    held: HeldKeys,
    pointer: Option<Vec2>,
    pending: Vec<Command>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press: movement keys are held, everything else may queue
    /// a command. Returns true if the key is bound to anything.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.held.set_key(key, true) {
            return true;
        }
        match Command::from_key(key) {
            Some(command) => {
                self.pending.push(command);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.set_key(key, false);
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Queue `command` unless it is already waiting for this frame
    pub fn push_once(&mut self, command: Command) {
        if !self.pending.contains(&command) {
            self.pending.push(command);
        }
    }

    pub fn set_pointer(&mut self, screen: Vec2) {
        self.pointer = Some(screen);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Release every held key (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.held = HeldKeys::default();
    }

    /// Snapshot for this frame; queued commands are consumed, held keys and
    /// the pointer persist
    pub fn drain(&mut self) -> TickInput {
        TickInput {
            held: self.held,
            pointer: self.pointer,
            commands: std::mem::take(&mut self.pending),
        }
    }
}
