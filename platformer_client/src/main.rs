//! Standalone headless client binary.
//!
//! Usage:
//!   cargo run -p platformer_client -- [--config sim.json] [--tick-hz 60]
//!
//! Runs the movement controller against the arcade body at a fixed rate.
//! Stdin lines are console commands, so key presses can be scripted:
//!
//!   press right      - hold right
//!   press space      - jump key down (queues a buffered jump)
//!   release space    - jump key up (may cut the jump)
//!   set coyote_ms 120
//!   status
//!   quit

use std::env;
use std::fs;
use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use platformer_client::GameHost;
use platformer_shared::config::SimConfig;
use tokio::sync::mpsc;
use tracing::{debug, info};

fn parse_args() -> anyhow::Result<SimConfig> {
    let args: Vec<String> = env::args().collect();
    let mut cfg = SimConfig::default();
    let mut tick_hz = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                let path = &args[i + 1];
                let raw = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
                cfg = SimConfig::from_json_str(&raw).with_context(|| format!("parse {path}"))?;
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                tick_hz = Some(args[i + 1].parse::<u32>().context("parse --tick-hz")?);
                i += 2;
            }
            _ => i += 1,
        }
    }
    if let Some(hz) = tick_hz {
        cfg.tick_hz = hz;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    info!(tick_hz = cfg.tick_hz, "Starting client");

    let mut host = GameHost::new(cfg.clone()).context("create host")?;

    // Key events arrive from stdin on their own thread, between frames.
    let (console_tx, mut console_rx) = mpsc::channel::<String>(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("Client ready. Type 'help' for commands, 'quit' to exit.");
    println!();

    let frame_ms = cfg.frame_ms();
    let tick_interval = Duration::from_secs_f64(frame_ms / 1000.0);
    let mut next_tick = tokio::time::Instant::now();

    while host.is_running() {
        while let Ok(line) = console_rx.try_recv() {
            match host.exec_console(&line) {
                Ok(output) => {
                    for line in output {
                        println!("{}", line);
                    }
                }
                Err(e) => println!("Error: {:#}", e),
            }
        }

        let report = host.tick(frame_ms);
        if host.tick_count() % cfg.tick_hz == 0 {
            debug!(
                tick = host.tick_count(),
                x = host.body.position.x,
                y = host.body.position.y,
                phase = ?report.phase,
                "frame"
            );
        }

        next_tick += tick_interval;
        tokio::time::sleep_until(next_tick).await;
    }

    info!(ticks = host.tick_count(), "Client stopped");
    Ok(())
}
