//! Configuration system.
//!
//! Loads controller and simulation tuning from JSON strings (file IO left to
//! the app). Every constant the controller reads lives here so it can be tuned
//! at startup, from the console, or per test.

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::physics::PhysicsConfig;

/// Tunable constants for one controlled character.
///
/// Speeds are in units per second, accelerations in units per second squared
/// and windows in milliseconds. Vertical values follow screen space, so a
/// negative `jump_velocity` points up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Target horizontal speed while grounded.
    pub move_speed: f32,
    /// Target horizontal speed while airborne.
    pub air_move_speed: f32,
    /// Maximum horizontal acceleration magnitude.
    pub accel: f32,
    /// Vertical velocity assigned when a jump starts.
    pub jump_velocity: f32,
    /// A release before this hold time does not cut the jump.
    pub min_jump_hold_ms: f64,
    /// After this hold time the jump can no longer be cut.
    pub max_jump_hold_ms: f64,
    /// Grace window after leaving the ground.
    pub coyote_ms: f64,
    /// Grace window for a press made before landing.
    pub jump_buffer_ms: f64,
    /// Upward speed ceiling applied when a jump is cut.
    pub jump_cut_velocity: f32,
    /// Opt-in clamps for misbehaving host clocks.
    pub hardening: Hardening,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 240.0,
            air_move_speed: 180.0,
            accel: 1800.0,
            jump_velocity: -620.0,
            min_jump_hold_ms: 40.0,
            max_jump_hold_ms: 160.0,
            coyote_ms: 90.0,
            jump_buffer_ms: 110.0,
            jump_cut_velocity: 100.0,
            hardening: Hardening::default(),
        }
    }
}

/// Clamps applied to host-supplied time before the controller uses it.
///
/// Both are off by default, which reproduces the unclamped behaviour exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Hardening {
    /// Upper bound for a frame's `delta_ms`. A stalled frame otherwise turns
    /// into one oversized acceleration step.
    pub max_frame_delta_ms: Option<f64>,
    /// Treat negative elapsed time as zero and never move `last_grounded_at`
    /// backwards.
    pub clamp_negative_elapsed: bool,
}

impl Hardening {
    /// Both clamps enabled with the given frame-delta cap.
    pub fn strict(max_frame_delta_ms: f64) -> Self {
        Self {
            max_frame_delta_ms: Some(max_frame_delta_ms),
            clamp_negative_elapsed: true,
        }
    }
}

/// Names accepted by [`ControllerConfig::get_field`] and
/// [`ControllerConfig::set_field`].
pub const FIELD_NAMES: [&str; 11] = [
    "move_speed",
    "air_move_speed",
    "accel",
    "jump_velocity",
    "min_jump_hold_ms",
    "max_jump_hold_ms",
    "coyote_ms",
    "jump_buffer_ms",
    "jump_cut_velocity",
    "max_frame_delta_ms",
    "clamp_negative_elapsed",
];

impl ControllerConfig {
    /// Parses config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Builder: set grounded and airborne target speeds.
    pub fn with_speeds(mut self, move_speed: f32, air_move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self.air_move_speed = air_move_speed;
        self
    }

    /// Builder: set horizontal acceleration.
    pub fn with_accel(mut self, accel: f32) -> Self {
        self.accel = accel;
        self
    }

    /// Builder: set coyote window.
    pub fn with_coyote_ms(mut self, ms: f64) -> Self {
        self.coyote_ms = ms;
        self
    }

    /// Builder: set jump buffer window.
    pub fn with_jump_buffer_ms(mut self, ms: f64) -> Self {
        self.jump_buffer_ms = ms;
        self
    }

    /// Builder: set the variable-height hold window.
    pub fn with_jump_hold_ms(mut self, min_ms: f64, max_ms: f64) -> Self {
        self.min_jump_hold_ms = min_ms;
        self.max_jump_hold_ms = max_ms;
        self
    }

    /// Builder: set jump impulse and cut ceiling.
    pub fn with_jump_velocity(mut self, jump_velocity: f32, jump_cut_velocity: f32) -> Self {
        self.jump_velocity = jump_velocity;
        self.jump_cut_velocity = jump_cut_velocity;
        self
    }

    /// Builder: set the time hardening block.
    pub fn with_hardening(mut self, hardening: Hardening) -> Self {
        self.hardening = hardening;
        self
    }

    /// Checks that the values describe a playable controller.
    pub fn validate(&self) -> anyhow::Result<()> {
        let speeds = [
            ("move_speed", self.move_speed),
            ("air_move_speed", self.air_move_speed),
            ("accel", self.accel),
            ("jump_cut_velocity", self.jump_cut_velocity),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a finite non-negative number, got {value}");
            }
        }
        if !self.jump_velocity.is_finite() || self.jump_velocity >= 0.0 {
            bail!(
                "jump_velocity must be negative (upward), got {}",
                self.jump_velocity
            );
        }

        let windows = [
            ("min_jump_hold_ms", self.min_jump_hold_ms),
            ("max_jump_hold_ms", self.max_jump_hold_ms),
            ("coyote_ms", self.coyote_ms),
            ("jump_buffer_ms", self.jump_buffer_ms),
        ];
        for (name, value) in windows {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a finite non-negative duration, got {value}");
            }
        }
        if self.min_jump_hold_ms > self.max_jump_hold_ms {
            bail!(
                "min_jump_hold_ms ({}) exceeds max_jump_hold_ms ({})",
                self.min_jump_hold_ms,
                self.max_jump_hold_ms
            );
        }
        if let Some(cap) = self.hardening.max_frame_delta_ms {
            if !cap.is_finite() || cap <= 0.0 {
                bail!("max_frame_delta_ms must be positive, got {cap}");
            }
        }
        Ok(())
    }

    /// Reads a field by name. Unset `max_frame_delta_ms` reads as `0`.
    pub fn get_field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "move_speed" => self.move_speed as f64,
            "air_move_speed" => self.air_move_speed as f64,
            "accel" => self.accel as f64,
            "jump_velocity" => self.jump_velocity as f64,
            "min_jump_hold_ms" => self.min_jump_hold_ms,
            "max_jump_hold_ms" => self.max_jump_hold_ms,
            "coyote_ms" => self.coyote_ms,
            "jump_buffer_ms" => self.jump_buffer_ms,
            "jump_cut_velocity" => self.jump_cut_velocity as f64,
            "max_frame_delta_ms" => self.hardening.max_frame_delta_ms.unwrap_or(0.0),
            "clamp_negative_elapsed" => {
                if self.hardening.clamp_negative_elapsed {
                    1.0
                } else {
                    0.0
                }
            }
            _ => return None,
        };
        Some(value)
    }

    /// Writes a field by name and re-validates. On error `self` is unchanged.
    ///
    /// A `max_frame_delta_ms` of `0` removes the cap.
    pub fn set_field(&mut self, name: &str, value: f64) -> anyhow::Result<()> {
        let mut next = self.clone();
        match name {
            "move_speed" => next.move_speed = value as f32,
            "air_move_speed" => next.air_move_speed = value as f32,
            "accel" => next.accel = value as f32,
            "jump_velocity" => next.jump_velocity = value as f32,
            "min_jump_hold_ms" => next.min_jump_hold_ms = value,
            "max_jump_hold_ms" => next.max_jump_hold_ms = value,
            "coyote_ms" => next.coyote_ms = value,
            "jump_buffer_ms" => next.jump_buffer_ms = value,
            "jump_cut_velocity" => next.jump_cut_velocity = value as f32,
            "max_frame_delta_ms" => {
                next.hardening.max_frame_delta_ms = (value != 0.0).then_some(value)
            }
            "clamp_negative_elapsed" => next.hardening.clamp_negative_elapsed = value != 0.0,
            other => bail!("unknown config field '{other}'"),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Root configuration for a simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed frame rate of the host loop.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

fn default_tick_hz() -> u32 {
    60
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            controller: ControllerConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Validates the nested controller config and the tick rate.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_hz == 0 {
            bail!("tick_hz must be at least 1");
        }
        self.controller.validate()
    }

    /// Duration of one host frame in milliseconds.
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.tick_hz.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ControllerConfig::default().validate().unwrap();
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ControllerConfig::from_json_str(r#"{ "coyote_ms": 120 }"#).unwrap();
        assert_eq!(cfg.coyote_ms, 120.0);
        assert_eq!(cfg.jump_buffer_ms, 110.0);
        assert_eq!(cfg.hardening, Hardening::default());
    }

    #[test]
    fn sim_config_nests_controller_and_physics() {
        let cfg = SimConfig::from_json_str(
            r#"{
                "tick_hz": 120,
                "controller": { "hardening": { "max_frame_delta_ms": 50 } },
                "physics": { "gravity": 900 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.tick_hz, 120);
        assert_eq!(cfg.controller.hardening.max_frame_delta_ms, Some(50.0));
        assert!(!cfg.controller.hardening.clamp_negative_elapsed);
        assert_eq!(cfg.physics.gravity, 900.0);
        assert!((cfg.frame_ms() - 8.333).abs() < 0.01);
    }

    #[test]
    fn validate_rejects_inverted_hold_window() {
        let cfg = ControllerConfig::default().with_jump_hold_ms(200.0, 100.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_downward_jump() {
        let cfg = ControllerConfig::default().with_jump_velocity(620.0, 100.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn set_field_roundtrips_through_get_field() {
        let mut cfg = ControllerConfig::default();
        for name in FIELD_NAMES {
            assert!(cfg.get_field(name).is_some(), "{name} not readable");
        }
        cfg.set_field("jump_buffer_ms", 150.0).unwrap();
        assert_eq!(cfg.get_field("jump_buffer_ms"), Some(150.0));

        cfg.set_field("max_frame_delta_ms", 100.0).unwrap();
        assert_eq!(cfg.hardening.max_frame_delta_ms, Some(100.0));
        cfg.set_field("max_frame_delta_ms", 0.0).unwrap();
        assert_eq!(cfg.hardening.max_frame_delta_ms, None);
    }

    #[test]
    fn set_field_leaves_config_untouched_on_error() {
        let mut cfg = ControllerConfig::default();
        assert!(cfg.set_field("min_jump_hold_ms", 500.0).is_err());
        assert!(cfg.set_field("gravity", 1.0).is_err());
        assert_eq!(cfg, ControllerConfig::default());
    }
}
