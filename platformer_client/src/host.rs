//! Host loop.
//!
//! The host owns everything around one controlled character:
//! - Keyboard state and the edge-detected jump events
//! - The event queue drained before every frame
//! - The `PlayerController` and the arcade body it drives
//! - A small console for live tuning
//!
//! The host clock advances only through [`GameHost::tick`], so a run is fully
//! determined by the sequence of key events and frame deltas.

use anyhow::{bail, Context};
use platformer_shared::{
    clock::FrameTime,
    config::{SimConfig, FIELD_NAMES},
    event::EventQueue,
    physics::ArcadeBody,
    FrameReport, PlayerController,
};
use tracing::{debug, info};

use crate::input::{Key, KeyboardInput};

/// Spawn x coordinate for the character.
pub const SPAWN_X: f32 = 100.0;

/// One simulated character plus its input plumbing.
pub struct GameHost {
    keyboard: KeyboardInput,
    events: EventQueue,
    controller: PlayerController,
    pub body: ArcadeBody,
    sim: SimConfig,
    now_ms: f64,
    tick: u32,
    last_report: Option<FrameReport>,
    running: bool,
}

impl GameHost {
    /// Creates a host with the character standing on the floor.
    pub fn new(sim: SimConfig) -> anyhow::Result<Self> {
        sim.validate().context("invalid sim config")?;
        let body = ArcadeBody::on_floor(sim.physics, SPAWN_X);
        let controller = PlayerController::new(sim.controller.clone());

        info!(
            tick_hz = sim.tick_hz,
            coyote_ms = sim.controller.coyote_ms,
            jump_buffer_ms = sim.controller.jump_buffer_ms,
            "host_created"
        );

        Ok(Self {
            keyboard: KeyboardInput::new(),
            events: EventQueue::new(),
            controller,
            body,
            sim,
            now_ms: 0.0,
            tick: 0,
            last_report: None,
            running: true,
        })
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Key-down stamped with the current host time.
    pub fn key_down(&mut self, key: Key) {
        self.key_down_at(key, self.now_ms);
    }

    /// Key-down stamped with an explicit timestamp.
    pub fn key_down_at(&mut self, key: Key, at_ms: f64) {
        if let Some(event) = self.keyboard.key_down(key, at_ms) {
            debug!(?key, at_ms, "jump_key_down");
            self.events.push(event);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keyboard.key_up(key);
    }

    /// Advances the host clock by `delta_ms` and runs one frame.
    pub fn tick(&mut self, delta_ms: f64) -> FrameReport {
        self.now_ms += delta_ms;
        let frame = FrameTime::new(self.now_ms, delta_ms);

        self.controller.apply_events(self.events.drain());
        let input = self.keyboard.sample();
        let report = self.controller.step(frame, &input, &mut self.body);
        self.body.integrate(report.frame.delta_secs());

        if report.jump_triggered {
            info!(
                tick = self.tick,
                now_ms = report.frame.now_ms,
                grounded = report.grounded,
                "jump"
            );
        }
        if report.jump_cut {
            info!(tick = self.tick, velocity_y = report.velocity_y, "jump_cut");
        }

        self.tick += 1;
        self.last_report = Some(report);
        report
    }

    /// Runs `frames` frames at the configured tick rate.
    pub fn run_frames(&mut self, frames: u32) -> Vec<FrameReport> {
        let dt = self.sim.frame_ms();
        (0..frames).map(|_| self.tick(dt)).collect()
    }

    /// Respawns the character and clears timers, keeping the tuning.
    pub fn reset(&mut self) {
        self.keyboard.release_all();
        self.events.clear();
        self.controller.reset();
        self.body = ArcadeBody::on_floor(self.sim.physics, SPAWN_X);
        self.last_report = None;
        info!(now_ms = self.now_ms, "host_reset");
    }

    /// Executes a console command.
    pub fn exec_console(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            return Ok(Vec::new());
        };

        match command {
            "help" => Ok(vec![
                "status                 - show character state".to_string(),
                "get <field>            - read a tuning value".to_string(),
                "set <field> <value>    - change a tuning value".to_string(),
                "press <key>            - key down (left/right/up/a/d/w/space)".to_string(),
                "release <key>          - key up".to_string(),
                "config                 - print tuning as JSON".to_string(),
                "reset                  - respawn the character".to_string(),
                "quit                   - exit".to_string(),
            ]),
            "status" => {
                let mut out = vec![
                    format!("Tick: {}", self.tick),
                    format!("Time: {:.1} ms", self.now_ms),
                    format!(
                        "Position: ({:.1}, {:.1})",
                        self.body.position.x, self.body.position.y
                    ),
                    format!(
                        "Velocity: ({:.1}, {:.1})",
                        self.body.velocity.x, self.body.velocity.y
                    ),
                    format!("Facing: {:?}", self.controller.facing()),
                ];
                if let Some(report) = &self.last_report {
                    out.push(format!("Phase: {:?}", report.phase));
                }
                let jump = self.controller.jump_state();
                out.push(format!("Pending press: {:?}", jump.jump_pressed_at));
                Ok(out)
            }
            "get" => {
                let Some(field) = tokens.get(1) else {
                    return Ok(vec![format!("Usage: get <{}>", FIELD_NAMES.join("|"))]);
                };
                match self.sim.controller.get_field(field) {
                    Some(value) => Ok(vec![format!("{field} = {value}")]),
                    None => bail!("unknown config field '{field}'"),
                }
            }
            "set" => {
                let (Some(field), Some(raw)) = (tokens.get(1), tokens.get(2)) else {
                    return Ok(vec!["Usage: set <field> <value>".to_string()]);
                };
                let value: f64 = raw
                    .parse()
                    .with_context(|| format!("parse value '{raw}'"))?;
                self.sim.controller.set_field(field, value)?;
                self.controller.set_config(self.sim.controller.clone());
                info!(field = %field, value, "config_changed");
                Ok(vec![format!("{field} = {value}")])
            }
            "press" | "release" => {
                let Some(name) = tokens.get(1) else {
                    return Ok(vec![format!("Usage: {command} <key>")]);
                };
                let key: Key = name.parse()?;
                if command == "press" {
                    self.key_down(key);
                } else {
                    self.key_up(key);
                }
                Ok(Vec::new())
            }
            "config" => {
                let json = serde_json::to_string_pretty(&self.sim.controller)
                    .context("serialize config")?;
                Ok(json.lines().map(ToString::to_string).collect())
            }
            "reset" => {
                self.reset();
                Ok(vec!["Character respawned".to_string()])
            }
            "quit" | "exit" => {
                self.running = false;
                Ok(Vec::new())
            }
            other => bail!("unknown command '{other}', try 'help'"),
        }
    }
}
