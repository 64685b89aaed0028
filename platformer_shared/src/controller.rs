//! Per-character controller: the frame step that ties input, movement and
//! jumping to a physics body.
//!
//! Frame order:
//! 1. sanitize the host frame time (opt-in hardening);
//! 2. read `grounded` from the body;
//! 3. movement → write `velocity_x`;
//! 4. jump state machine → write `velocity_y` override, if any.
//!
//! The body integrates afterwards and reports `grounded` for the next frame.

use tracing::trace;

use crate::clock::{FrameGuard, FrameTime};
use crate::config::ControllerConfig;
use crate::event::ControllerEvent;
use crate::input::InputSignals;
use crate::jump::{JumpController, JumpPhase, JumpState};
use crate::movement::{Facing, MovementController};
use crate::physics::PhysicsBody;

/// Summary of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame time after hardening.
    pub frame: FrameTime,
    pub grounded: bool,
    pub velocity_x: f32,
    /// Vertical velocity after the step (the body's value if untouched).
    pub velocity_y: f32,
    pub facing: Facing,
    pub phase: JumpPhase,
    pub jump_triggered: bool,
    pub jump_cut: bool,
}

/// Movement and jump state for one controlled character.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    movement: MovementController,
    jump: JumpController,
    guard: FrameGuard,
}

impl PlayerController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            movement: MovementController::new(),
            jump: JumpController::new(),
            guard: FrameGuard::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replaces the tuning. Timers and flags carry over.
    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    pub fn facing(&self) -> Facing {
        self.movement.facing()
    }

    pub fn jump_state(&self) -> &JumpState {
        self.jump.state()
    }

    /// Clears timers, facing and the frame guard. The tuning is kept.
    pub fn reset(&mut self) {
        self.movement = MovementController::new();
        self.jump = JumpController::new();
        self.guard.reset();
    }

    /// Records a jump key-down at `at_ms`.
    pub fn on_jump_pressed(&mut self, at_ms: f64) {
        self.jump.on_jump_pressed(at_ms);
    }

    /// Feeds queued events, in order, before the next step.
    pub fn apply_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = ControllerEvent>,
    {
        for event in events {
            match event {
                ControllerEvent::JumpPressed { at_ms } => self.on_jump_pressed(at_ms),
            }
        }
    }

    /// Runs one frame against `body`.
    pub fn step<I, B>(&mut self, frame: FrameTime, input: &I, body: &mut B) -> FrameReport
    where
        I: InputSignals + ?Sized,
        B: PhysicsBody + ?Sized,
    {
        let frame = self.guard.sanitize(frame, &self.config.hardening);
        let grounded = body.grounded();

        let vx = self.movement.step(
            &self.config,
            input.left_held(),
            input.right_held(),
            grounded,
            body.velocity_x(),
            frame.delta_ms,
        );
        body.set_velocity_x(vx);

        let jump = self.jump.step(
            &self.config,
            frame.now_ms,
            grounded,
            input.jump_held(),
            body.velocity_y(),
        );
        if let Some(vy) = jump.velocity_y {
            body.set_velocity_y(vy);
        }

        let phase = self.jump.phase(&self.config, frame.now_ms, grounded);
        trace!(
            now_ms = frame.now_ms,
            grounded,
            velocity_x = vx,
            velocity_y = body.velocity_y(),
            ?phase,
            "controller_step"
        );

        FrameReport {
            frame,
            grounded,
            velocity_x: vx,
            velocity_y: body.velocity_y(),
            facing: self.movement.facing(),
            phase,
            jump_triggered: jump.triggered,
            jump_cut: jump.cut,
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hardening;
    use crate::input::{Buttons, InputState};
    use crate::physics::ManualBody;

    #[test]
    fn step_writes_both_axes() {
        let mut pc = PlayerController::default();
        let mut body = ManualBody::on_ground();
        pc.on_jump_pressed(0.0);
        let report = pc.step(
            FrameTime::new(0.0, 16.0),
            &InputState::right().with(Buttons::JUMP),
            &mut body,
        );
        assert!(report.jump_triggered);
        assert!((body.velocity.x - 28.8).abs() < 1e-3);
        assert_eq!(body.velocity.y, -620.0);
        assert_eq!(report.velocity_y, -620.0);
        assert_eq!(report.facing, Facing::Right);
    }

    #[test]
    fn untouched_vertical_velocity_is_left_alone() {
        let mut pc = PlayerController::default();
        let mut body = ManualBody::in_air(250.0);
        let report = pc.step(FrameTime::new(0.0, 16.0), &InputState::NONE, &mut body);
        assert_eq!(body.velocity.y, 250.0);
        assert_eq!(report.phase, JumpPhase::CoyoteExpired);
    }

    #[test]
    fn events_are_applied_in_order() {
        let mut pc = PlayerController::default();
        pc.apply_events([
            ControllerEvent::JumpPressed { at_ms: 5.0 },
            ControllerEvent::JumpPressed { at_ms: 200.0 },
        ]);
        assert_eq!(pc.jump_state().jump_pressed_at, Some(200.0));
    }

    #[test]
    fn hardening_caps_hitch_acceleration() {
        let config = ControllerConfig::default().with_hardening(Hardening::strict(50.0));
        let mut pc = PlayerController::new(config);
        let mut body = ManualBody::on_ground();
        let report = pc.step(FrameTime::new(2000.0, 2000.0), &InputState::right(), &mut body);
        assert_eq!(report.frame.delta_ms, 50.0);
        assert!((body.velocity.x - 90.0).abs() < 1e-3);

        let mut raw = PlayerController::default();
        let mut body = ManualBody::on_ground();
        raw.step(FrameTime::new(2000.0, 2000.0), &InputState::right(), &mut body);
        assert_eq!(body.velocity.x, 240.0);
    }

    #[test]
    fn negative_delta_cap_from_json_does_not_panic() {
        let config =
            ControllerConfig::from_json_str(r#"{ "hardening": { "max_frame_delta_ms": -5 } }"#)
                .unwrap();
        let mut pc = PlayerController::new(config);
        let mut body = ManualBody::on_ground();
        let report = pc.step(FrameTime::new(16.0, 16.0), &InputState::right(), &mut body);
        assert_eq!(report.frame.delta_ms, 16.0);
        assert!((report.velocity_x - 28.8).abs() < 1e-3);
    }

    #[test]
    fn reset_clears_state_but_keeps_tuning() {
        let config = ControllerConfig::default().with_coyote_ms(120.0);
        let mut pc = PlayerController::new(config);
        let mut body = ManualBody::on_ground();
        pc.step(FrameTime::new(0.0, 16.0), &InputState::left(), &mut body);
        pc.on_jump_pressed(10.0);
        assert_eq!(pc.facing(), Facing::Left);

        pc.reset();
        assert_eq!(pc.facing(), Facing::Right);
        assert_eq!(pc.jump_state(), &JumpState::default());
        assert_eq!(pc.config().coyote_ms, 120.0);
    }
}
