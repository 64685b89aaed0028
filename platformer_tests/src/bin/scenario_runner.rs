//! Scenario runner with JSON report output.
//!
//! Replays the movement and jump timing scenarios against the default tuning
//! and writes `controller-scenarios.json` to the report directory
//! (`--report-dir <dir>`, `scenario-reports` by default). Exits non-zero on
//! any failure.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use platformer_client::host::GameHost;
use platformer_client::input::Key;
use platformer_shared::prelude::*;
use platformer_shared::report::{ScenarioReport, ScenarioResult};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let output_dir = parse_report_dir();

    println!("Platformer Controller Scenarios");
    println!("===============================\n");

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut report = ScenarioReport::new("Platformer Controller Scenarios")
        .with_config(&ControllerConfig::default())?;

    println!("Running movement scenarios...");
    run_movement_scenarios(&mut report);

    println!("Running jump scenarios...");
    run_jump_scenarios(&mut report);

    println!("Running host loop scenarios...");
    run_host_scenarios(&mut report);

    for result in &report.results {
        println!("  {} {} {}", result.status.icon(), result.id, result.name);
    }

    println!("\nBy category:");
    for (category, stats) in report.stats_by_category() {
        println!(
            "  {:<10} {}/{} passed ({:.1}%)",
            category,
            stats.passed,
            stats.total,
            stats.pass_rate()
        );
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("\nFailures:");
        for result in failures {
            let msg = result.error_message.as_deref().unwrap_or("no message");
            println!("  {} {}: {}", result.id, result.name, msg);
        }
    }

    let stats = report.overall_stats();
    println!("\n===============================");
    println!("Total:   {}", stats.total);
    println!("Passed:  {} ✓", stats.passed);
    println!("Failed:  {} ✗", stats.failed);
    println!("Skipped: {} ○", stats.skipped);
    println!("Pass Rate: {:.1}%", stats.pass_rate());

    let json_path = output_dir.join("controller-scenarios.json");
    report
        .save_json(&json_path)
        .with_context(|| format!("writing {}", json_path.display()))?;
    println!("\nReport saved to {}", json_path.display());

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_report_dir() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    let mut dir = PathBuf::from("scenario-reports");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--report-dir" if i + 1 < args.len() => {
                dir = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            _ => i += 1,
        }
    }
    dir
}

fn run_scenario<F>(id: &str, name: &str, category: &str, description: &str, f: F) -> ScenarioResult
where
    F: FnOnce() -> Result<(), String>,
{
    let start = Instant::now();
    let outcome = f();
    let duration = start.elapsed();

    let result = ScenarioResult::new(id, name, category).with_description(description);
    match outcome {
        Ok(()) => result.pass(duration),
        Err(e) => result.fail(duration, &e),
    }
}

/// Controller over a scripted body, stepped at explicit timestamps.
struct Script {
    pc: PlayerController,
    body: ManualBody,
    last_now: f64,
}

impl Script {
    fn new() -> Self {
        Self {
            pc: PlayerController::default(),
            body: ManualBody::default(),
            last_now: 0.0,
        }
    }

    fn frame(&mut self, now: f64, grounded: bool, input: InputState) -> FrameReport {
        self.body.grounded = grounded;
        let delta = (now - self.last_now).max(0.0);
        self.last_now = now;
        self.pc.step(FrameTime::new(now, delta), &input, &mut self.body)
    }
}

fn expect(cond: bool, msg: impl FnOnce() -> String) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(msg())
    }
}

fn run_movement_scenarios(report: &mut ScenarioReport) {
    const CATEGORY: &str = "Movement";

    report.add_result(run_scenario(
        "MOV-001",
        "Acceleration From Rest",
        CATEGORY,
        "One 16 ms grounded frame holding right reaches 28.8",
        || {
            let mut s = Script::new();
            let r = s.frame(16.0, true, InputState::right());
            expect((r.velocity_x - 28.8).abs() < 1e-3, || {
                format!("expected 28.8, got {}", r.velocity_x)
            })
        },
    ));

    report.add_result(run_scenario(
        "MOV-002",
        "Right Overrides Left",
        CATEGORY,
        "Holding both directions targets +move_speed",
        || {
            let mut s = Script::new();
            let mut last = 0.0;
            for i in 1..=20 {
                last = s
                    .frame(i as f64 * 16.0, true, InputState::left().with(Buttons::RIGHT))
                    .velocity_x;
            }
            expect(last == 240.0, || format!("expected 240, got {last}"))?;
            expect(s.pc.facing() == Facing::Right, || "facing flipped".to_string())
        },
    ));

    report.add_result(run_scenario(
        "MOV-003",
        "Airborne Target",
        CATEGORY,
        "Airborne speed converges to air_move_speed without overshoot",
        || {
            let mut s = Script::new();
            s.body.velocity.x = 240.0;
            for i in 1..=20 {
                let r = s.frame(i as f64 * 16.0, false, InputState::right());
                expect(r.velocity_x >= 180.0, || {
                    format!("dropped below air target: {}", r.velocity_x)
                })?;
            }
            expect(s.body.velocity.x == 180.0, || {
                format!("expected 180, got {}", s.body.velocity.x)
            })
        },
    ));
}

fn run_jump_scenarios(report: &mut ScenarioReport) {
    const CATEGORY: &str = "Jump";

    report.add_result(run_scenario(
        "JMP-001",
        "Coyote Inside Window",
        CATEGORY,
        "Press 80 ms after leaving the ground still jumps",
        || {
            let mut s = Script::new();
            s.frame(0.0, true, InputState::NONE);
            s.frame(16.0, false, InputState::NONE);
            s.pc.on_jump_pressed(80.0);
            let r = s.frame(80.0, false, InputState::jump());
            expect(r.jump_triggered, || "no coyote jump at 80 ms".to_string())
        },
    ));

    report.add_result(run_scenario(
        "JMP-002",
        "Coyote Expired",
        CATEGORY,
        "Press 95 ms after leaving the ground does not jump",
        || {
            let mut s = Script::new();
            s.frame(0.0, true, InputState::NONE);
            s.frame(16.0, false, InputState::NONE);
            s.pc.on_jump_pressed(95.0);
            let r = s.frame(95.0, false, InputState::jump());
            expect(!r.jump_triggered, || "jumped after coyote expiry".to_string())
        },
    ));

    report.add_result(run_scenario(
        "JMP-003",
        "Buffered Press Fires",
        CATEGORY,
        "Press 90 ms before landing jumps on the landing frame",
        || {
            let mut s = Script::new();
            s.body = ManualBody::in_air(400.0);
            s.pc.on_jump_pressed(0.0);
            s.frame(0.0, false, InputState::jump());
            let r = s.frame(90.0, true, InputState::jump());
            expect(r.jump_triggered, || "buffered press ignored".to_string())
        },
    ));

    report.add_result(run_scenario(
        "JMP-004",
        "Buffered Press Expires",
        CATEGORY,
        "Press 150 ms before landing is dropped",
        || {
            let mut s = Script::new();
            s.body = ManualBody::in_air(400.0);
            s.pc.on_jump_pressed(0.0);
            s.frame(0.0, false, InputState::NONE);
            let r = s.frame(150.0, true, InputState::NONE);
            expect(!r.jump_triggered, || "stale press triggered".to_string())
        },
    ));

    report.add_result(run_scenario(
        "JMP-005",
        "Exactly Once",
        CATEGORY,
        "A consumed press cannot trigger again on the same timestamp",
        || {
            let mut s = Script::new();
            s.pc.on_jump_pressed(100.0);
            let first = s.frame(100.0, true, InputState::jump());
            let second = s.frame(100.0, true, InputState::jump());
            expect(first.jump_triggered && !second.jump_triggered, || {
                format!(
                    "triggers: first={} second={}",
                    first.jump_triggered, second.jump_triggered
                )
            })
        },
    ));

    report.add_result(run_scenario(
        "JMP-006",
        "Early Release Cut",
        CATEGORY,
        "Releasing 50 ms into a coyote jump clamps upward speed to -100",
        || {
            let mut s = Script::new();
            s.frame(-16.0, true, InputState::NONE);
            s.pc.on_jump_pressed(0.0);
            s.frame(0.0, false, InputState::jump());
            s.body.velocity.y = -530.0;
            let r = s.frame(50.0, false, InputState::NONE);
            expect(r.jump_cut && s.body.velocity.y == -100.0, || {
                format!("cut={} vy={}", r.jump_cut, s.body.velocity.y)
            })
        },
    ));

    report.add_result(run_scenario(
        "JMP-007",
        "Hold Past Max",
        CATEGORY,
        "Releasing after max_jump_hold_ms leaves velocity untouched",
        || {
            let mut s = Script::new();
            s.frame(-16.0, true, InputState::NONE);
            s.pc.on_jump_pressed(0.0);
            s.frame(0.0, false, InputState::jump());
            s.frame(170.0, false, InputState::jump());
            s.body.velocity.y = -250.0;
            let r = s.frame(186.0, false, InputState::NONE);
            expect(!r.jump_cut && s.body.velocity.y == -250.0, || {
                format!("cut={} vy={}", r.jump_cut, s.body.velocity.y)
            })
        },
    ));

    report.add_result(run_scenario(
        "JMP-008",
        "Landing Resets Jump",
        CATEGORY,
        "A grounded frame clears the jump in progress",
        || {
            let mut s = Script::new();
            s.frame(-16.0, true, InputState::NONE);
            s.pc.on_jump_pressed(0.0);
            s.frame(0.0, false, InputState::jump());
            let r = s.frame(20.0, true, InputState::NONE);
            let st = s.pc.jump_state();
            expect(
                r.phase == JumpPhase::Grounded
                    && st.jump_started_at.is_none()
                    && !st.variable_jump_active,
                || format!("state after landing: {st:?}"),
            )
        },
    ));
}

fn run_host_scenarios(report: &mut ScenarioReport) {
    const CATEGORY: &str = "Host Loop";

    let mut frames = 0;
    let result = run_scenario(
        "HST-001",
        "Jump And Land",
        CATEGORY,
        "A Space tap on the arcade body leaves the floor and lands again",
        || {
            let mut host = GameHost::new(SimConfig::default()).map_err(|e| e.to_string())?;
            host.key_down(Key::Space);
            let first = host.tick(16.0);
            host.key_up(Key::Space);
            expect(first.jump_triggered, || "tap did not jump".to_string())?;

            let mut left_ground = false;
            for _ in 0..120 {
                let r = host.tick(16.0);
                left_ground |= !r.grounded;
                if left_ground && r.grounded {
                    frames = host.tick_count();
                    return Ok(());
                }
            }
            Err("never landed".to_string())
        },
    );
    report.add_result(result.with_frames(frames));

    report.add_result(run_scenario(
        "HST-002",
        "Console Tuning",
        CATEGORY,
        "Setting coyote_ms through the console changes the controller",
        || {
            let mut host = GameHost::new(SimConfig::default()).map_err(|e| e.to_string())?;
            host.exec_console("set coyote_ms 120").map_err(|e| e.to_string())?;
            let coyote = host.controller().config().coyote_ms;
            expect(coyote == 120.0, || format!("coyote_ms is {coyote}"))
        },
    ));
}
