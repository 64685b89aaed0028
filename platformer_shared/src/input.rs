//! Input signals consumed by the controller.
//!
//! The controller only sees held-state booleans sampled once per frame. The
//! edge-triggered "jump pressed" signal travels separately as a
//! [`ControllerEvent`](crate::event::ControllerEvent) so it can arrive between
//! frames.

bitflags::bitflags! {
    /// Buttons held during a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP  = 1 << 2;
    }
}

/// Per-frame held state, as provided by whatever polls the keyboard or pad.
pub trait InputSignals {
    fn left_held(&self) -> bool;
    fn right_held(&self) -> bool;
    fn jump_held(&self) -> bool;
}

/// Sampled input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub buttons: Buttons,
}

impl InputState {
    pub const NONE: Self = Self {
        buttons: Buttons::empty(),
    };

    pub const fn new(buttons: Buttons) -> Self {
        Self { buttons }
    }

    pub fn left() -> Self {
        Self::new(Buttons::LEFT)
    }

    pub fn right() -> Self {
        Self::new(Buttons::RIGHT)
    }

    pub fn jump() -> Self {
        Self::new(Buttons::JUMP)
    }

    /// Returns a copy with `buttons` also held.
    pub fn with(self, buttons: Buttons) -> Self {
        Self::new(self.buttons | buttons)
    }
}

impl InputSignals for InputState {
    fn left_held(&self) -> bool {
        self.buttons.contains(Buttons::LEFT)
    }

    fn right_held(&self) -> bool {
        self.buttons.contains(Buttons::RIGHT)
    }

    fn jump_held(&self) -> bool {
        self.buttons.contains(Buttons::JUMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_buttons_report_each_signal() {
        let input = InputState::left().with(Buttons::RIGHT | Buttons::JUMP);
        assert!(input.left_held());
        assert!(input.right_held());
        assert!(input.jump_held());
    }

    #[test]
    fn none_holds_nothing() {
        let input = InputState::NONE;
        assert!(!input.left_held());
        assert!(!input.right_held());
        assert!(!input.jump_held());
        assert_eq!(input, InputState::default());
    }
}
