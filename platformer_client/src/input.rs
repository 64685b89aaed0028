//! Keyboard bindings and edge detection.
//!
//! In a windowed build this would be fed by the platform's key events. Here it
//! only tracks which keys are down, turns them into per-frame [`InputState`]
//! and emits a `JumpPressed` event on the rising edge of the jump key.
//!
//! Bindings: left = ArrowLeft | A, right = ArrowRight | D,
//! jump held = ArrowUp | W | Space. Only Space queues a buffered jump.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::bail;
use platformer_shared::{
    event::ControllerEvent,
    input::{Buttons, InputState},
};

/// Keys the controller is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    A,
    D,
    W,
    Space,
}

impl Key {
    /// Buttons this key holds while down.
    pub fn buttons(self) -> Buttons {
        match self {
            Key::ArrowLeft | Key::A => Buttons::LEFT,
            Key::ArrowRight | Key::D => Buttons::RIGHT,
            Key::ArrowUp | Key::W | Key::Space => Buttons::JUMP,
        }
    }

    /// Whether key-down on this key queues a buffered jump.
    pub fn queues_jump(self) -> bool {
        self == Key::Space
    }
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let key = match s.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "up" | "arrowup" => Key::ArrowUp,
            "a" => Key::A,
            "d" => Key::D,
            "w" => Key::W,
            "space" | "jump" => Key::Space,
            other => bail!("unknown key '{other}'"),
        };
        Ok(key)
    }
}

/// Current key state.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    down: HashSet<Key>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a key-down. Returns the jump event for a fresh Space press;
    /// auto-repeat while already down returns `None`.
    pub fn key_down(&mut self, key: Key, at_ms: f64) -> Option<ControllerEvent> {
        let fresh = self.down.insert(key);
        (fresh && key.queues_jump()).then_some(ControllerEvent::JumpPressed { at_ms })
    }

    pub fn key_up(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.down.clear();
    }

    /// Samples the held state for this frame.
    pub fn sample(&self) -> InputState {
        let buttons = self
            .down
            .iter()
            .fold(Buttons::empty(), |acc, key| acc | key.buttons());
        InputState::new(buttons)
    }
}
