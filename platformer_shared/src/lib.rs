//! `platformer_shared`
//!
//! Movement core for a 2D platformer character, shared by the host and tests.
//!
//! Design goals:
//! - Deterministic: every decision is a function of the frame time, the input
//!   signals and the body's grounded flag.
//! - Per-character state only. No globals, so several characters or a replay
//!   can run side by side.
//! - Traits at the engine seams (`InputSignals`, `PhysicsBody`).
//! - No `unsafe`.

pub mod clock;
pub mod config;
pub mod controller;
pub mod event;
pub mod input;
pub mod jump;
pub mod math;
pub mod movement;
pub mod physics;
pub mod report;

pub use controller::{FrameReport, PlayerController};

pub mod prelude {
    //! Commonly used exports.

    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::event::*;
    pub use crate::input::*;
    pub use crate::jump::*;
    pub use crate::math::*;
    pub use crate::movement::*;
    pub use crate::physics::*;
}
