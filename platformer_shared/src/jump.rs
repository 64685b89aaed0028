//! Jump state machine: coyote time, jump buffering and variable jump height.
//!
//! Three windows overlap against a grounded flag that changes every frame:
//!
//! - **coyote**: a jump still fires for `coyote_ms` after the body was last
//!   grounded;
//! - **buffer**: a press is remembered for `jump_buffer_ms` and fires as soon
//!   as the body is grounded or within coyote time;
//! - **variable height**: between `min_jump_hold_ms` and `max_jump_hold_ms`
//!   after takeoff, releasing the jump input clamps the upward speed once.
//!
//! A buffered press is consumed in the same step that triggers, so one press
//! can never cause two jumps.
//!
//! Ledge hang/climb would be a further phase entered from the airborne phases;
//! it is not implemented and nothing here anticipates its rules.

use tracing::{debug, trace};

use crate::clock::elapsed_ms;
use crate::config::ControllerConfig;

/// Timers and flags owned by one [`JumpController`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JumpState {
    /// Last frame the body was grounded. `None` until the first grounded frame,
    /// so a character spawned in the air has no coyote window until it lands.
    pub last_grounded_at: Option<f64>,
    /// Most recent unconsumed press.
    pub jump_pressed_at: Option<f64>,
    /// When the current jump impulse was issued.
    pub jump_started_at: Option<f64>,
    /// True while the current jump may still be cut short.
    pub variable_jump_active: bool,
}

/// Conceptual phase of the state machine, derived from [`JumpState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    /// Airborne, no jump in progress, still inside the coyote window.
    Coyote,
    /// Airborne past the coyote window. A press only queues for landing.
    CoyoteExpired,
    /// Rising from a jump that can still be cut.
    RisingVariable,
    /// Jumped, but the cut window is closed; gravity governs until landing.
    Ballistic,
}

/// What a single [`JumpController::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpStep {
    /// Vertical velocity to write to the body, if any.
    pub velocity_y: Option<f32>,
    pub triggered: bool,
    pub cut: bool,
}

#[derive(Debug, Clone, Default)]
pub struct JumpController {
    state: JumpState,
}

impl JumpController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &JumpState {
        &self.state
    }

    /// Records a jump key-down. Overwrites any press still pending.
    pub fn on_jump_pressed(&mut self, now: f64) {
        self.state.jump_pressed_at = Some(now);
    }

    /// Whether a press is waiting to be consumed, regardless of its age.
    pub fn has_pending_press(&self) -> bool {
        self.state.jump_pressed_at.is_some()
    }

    /// Advances the state machine by one frame.
    ///
    /// `velocity_y` is the body's current vertical velocity; it is only read to
    /// decide whether a cut applies.
    pub fn step(
        &mut self,
        config: &ControllerConfig,
        now: f64,
        grounded: bool,
        holding_jump: bool,
        velocity_y: f32,
    ) -> JumpStep {
        let clamp = config.hardening.clamp_negative_elapsed;
        let st = &mut self.state;
        let mut out = JumpStep::default();
        let mut vy = velocity_y;

        if grounded {
            st.last_grounded_at = Some(match st.last_grounded_at {
                Some(prev) if clamp => prev.max(now),
                _ => now,
            });
        }

        let wants_jump = st
            .jump_pressed_at
            .is_some_and(|at| elapsed_ms(now, at, clamp) <= config.jump_buffer_ms);
        let can_coyote = st
            .last_grounded_at
            .is_some_and(|at| elapsed_ms(now, at, clamp) <= config.coyote_ms);

        if (grounded || can_coyote) && wants_jump {
            vy = config.jump_velocity;
            st.jump_started_at = Some(now);
            st.variable_jump_active = true;
            st.jump_pressed_at = None;
            out.triggered = true;
            out.velocity_y = Some(vy);
            debug!(now, grounded, coyote = !grounded, "jump_triggered");
        }

        if st.variable_jump_active {
            if let Some(started) = st.jump_started_at {
                let held_ms = elapsed_ms(now, started, clamp);

                if !holding_jump && held_ms >= config.min_jump_hold_ms {
                    let ceiling = -config.jump_cut_velocity;
                    if vy < ceiling {
                        vy = ceiling;
                        out.cut = true;
                        out.velocity_y = Some(vy);
                        debug!(now, held_ms, velocity_y = vy, "jump_cut");
                    }
                    st.variable_jump_active = false;
                }
                if held_ms > config.max_jump_hold_ms {
                    st.variable_jump_active = false;
                    trace!(now, held_ms, "variable_jump_expired");
                }
            }
        }

        if grounded {
            st.jump_started_at = None;
            st.variable_jump_active = false;
        }

        out
    }

    /// Current phase for a frame at `now`.
    pub fn phase(&self, config: &ControllerConfig, now: f64, grounded: bool) -> JumpPhase {
        let st = &self.state;
        if grounded {
            return JumpPhase::Grounded;
        }
        if st.variable_jump_active {
            return JumpPhase::RisingVariable;
        }
        if st.jump_started_at.is_some() {
            return JumpPhase::Ballistic;
        }
        let clamp = config.hardening.clamp_negative_elapsed;
        let in_coyote = st
            .last_grounded_at
            .is_some_and(|at| elapsed_ms(now, at, clamp) <= config.coyote_ms);
        if in_coyote {
            JumpPhase::Coyote
        } else {
            JumpPhase::CoyoteExpired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ControllerConfig {
        ControllerConfig::default()
    }

    /// Grounded at t=0, then airborne from the next frame on.
    fn left_ground_at_zero() -> JumpController {
        let mut jc = JumpController::new();
        jc.step(&cfg(), 0.0, true, false, 0.0);
        jc
    }

    #[test]
    fn coyote_jump_inside_window() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(80.0);
        let step = jc.step(&cfg(), 80.0, false, true, 50.0);
        assert!(step.triggered);
        assert_eq!(step.velocity_y, Some(-620.0));
        assert!(jc.state().variable_jump_active);
    }

    #[test]
    fn no_coyote_jump_after_window() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(95.0);
        let step = jc.step(&cfg(), 95.0, false, true, 50.0);
        assert!(!step.triggered);
        assert_eq!(step.velocity_y, None);
        // Still buffered for a later landing.
        assert!(jc.has_pending_press());
    }

    #[test]
    fn buffered_press_fires_on_landing() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(0.0);
        assert!(!jc.step(&cfg(), 0.0, false, true, 300.0).triggered);
        let step = jc.step(&cfg(), 90.0, true, true, 0.0);
        assert!(step.triggered);
        assert!(!jc.has_pending_press());
    }

    #[test]
    fn buffered_press_expires_before_late_landing() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(0.0);
        let step = jc.step(&cfg(), 150.0, true, false, 0.0);
        assert!(!step.triggered);
    }

    #[test]
    fn press_is_consumed_exactly_once() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(100.0);
        assert!(jc.step(&cfg(), 100.0, true, true, 0.0).triggered);
        assert!(!jc.step(&cfg(), 100.0, true, true, -620.0).triggered);
        assert!(!jc.step(&cfg(), 116.0, true, true, 0.0).triggered);
    }

    #[test]
    fn newer_press_replaces_pending_one() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(0.0);
        jc.on_jump_pressed(100.0);
        // 150 is past the first press's window but inside the second's.
        assert!(jc.step(&cfg(), 150.0, true, false, 0.0).triggered);
        assert!(!jc.has_pending_press());
    }

    #[test]
    fn release_after_min_hold_cuts_once() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(10.0);
        assert!(jc.step(&cfg(), 10.0, false, true, 0.0).triggered);

        // Released too early: no cut yet, window stays open.
        let step = jc.step(&cfg(), 30.0, false, false, -580.0);
        assert!(!step.cut);
        assert!(jc.state().variable_jump_active);

        let step = jc.step(&cfg(), 60.0, false, false, -560.0);
        assert!(step.cut);
        assert_eq!(step.velocity_y, Some(-100.0));
        assert!(!jc.state().variable_jump_active);

        let step = jc.step(&cfg(), 210.0, false, false, -400.0);
        assert!(!step.cut);
        assert_eq!(step.velocity_y, None);
    }

    #[test]
    fn cut_does_not_speed_up_a_slow_rise() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(10.0);
        jc.step(&cfg(), 10.0, false, true, 0.0);

        let step = jc.step(&cfg(), 60.0, false, false, -40.0);
        assert!(!step.cut);
        assert_eq!(step.velocity_y, None);
        assert!(!jc.state().variable_jump_active);
    }

    #[test]
    fn holding_past_max_closes_window() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(10.0);
        jc.step(&cfg(), 10.0, false, true, 0.0);

        jc.step(&cfg(), 170.0, false, true, -330.0);
        assert!(jc.state().variable_jump_active);
        jc.step(&cfg(), 171.0, false, true, -320.0);
        assert!(!jc.state().variable_jump_active);

        let step = jc.step(&cfg(), 190.0, false, false, -300.0);
        assert!(!step.cut);
    }

    #[test]
    fn ground_trigger_closes_variable_window_same_frame() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(0.0);
        let step = jc.step(&cfg(), 0.0, true, true, 0.0);
        assert!(step.triggered);
        assert_eq!(jc.state().jump_started_at, None);
        assert!(!jc.state().variable_jump_active);
    }

    #[test]
    fn landing_resets_jump_in_progress() {
        let mut jc = left_ground_at_zero();
        jc.on_jump_pressed(10.0);
        jc.step(&cfg(), 10.0, false, true, 0.0);
        assert!(jc.state().jump_started_at.is_some());

        jc.step(&cfg(), 20.0, true, true, 0.0);
        assert_eq!(jc.state().jump_started_at, None);
        assert!(!jc.state().variable_jump_active);
        assert_eq!(jc.state().last_grounded_at, Some(20.0));
    }

    #[test]
    fn never_grounded_has_no_coyote() {
        let mut jc = JumpController::new();
        jc.on_jump_pressed(5.0);
        assert!(!jc.step(&cfg(), 5.0, false, true, 0.0).triggered);
    }

    #[test]
    fn backwards_clock_is_clamped_when_hardened() {
        let config = cfg().with_hardening(crate::config::Hardening::strict(100.0));
        let mut jc = JumpController::new();
        jc.step(&config, 1000.0, true, false, 0.0);
        jc.step(&config, 900.0, true, false, 0.0);
        assert_eq!(jc.state().last_grounded_at, Some(1000.0));

        let mut raw = JumpController::new();
        raw.step(&cfg(), 1000.0, true, false, 0.0);
        raw.step(&cfg(), 900.0, true, false, 0.0);
        assert_eq!(raw.state().last_grounded_at, Some(900.0));
    }

    #[test]
    fn phase_follows_state() {
        let config = cfg();
        let mut jc = left_ground_at_zero();
        assert_eq!(jc.phase(&config, 0.0, true), JumpPhase::Grounded);
        assert_eq!(jc.phase(&config, 50.0, false), JumpPhase::Coyote);
        assert_eq!(jc.phase(&config, 120.0, false), JumpPhase::CoyoteExpired);

        jc.on_jump_pressed(60.0);
        jc.step(&config, 60.0, false, true, 0.0);
        assert_eq!(jc.phase(&config, 60.0, false), JumpPhase::RisingVariable);

        jc.step(&config, 230.0, false, true, -200.0);
        assert_eq!(jc.phase(&config, 230.0, false), JumpPhase::Ballistic);
    }
}
