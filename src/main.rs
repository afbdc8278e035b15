//! Witch Run headless runner
//!
//! Plays the simulation without a renderer. The headless scene stands in for
//! physics, and a simple autoplayer taps just before gaps and steps.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use witch_run::sim::{GameEvent, GameSession, TickInput, tick};
use witch_run::{HeadlessScene, HudText, Tuning};

/// How far ahead (in nominal frames of scrolling) the autoplayer looks
const LOOKAHEAD_FRAMES: f32 = 6.0;

#[derive(Debug, Parser)]
#[command(name = "witch-run", about = "Play the endless runner headless")]
struct Args {
    /// RNG seed (overrides the tuning file)
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to simulate at 60 Hz
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Stop after this many runs have ended
    #[arg(long, default_value_t = 3)]
    runs: u32,
    /// JSON tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
    /// Never jump (runs end at the first gap or step)
    #[arg(long)]
    no_autoplay: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    if let Some(seed) = args.seed {
        tuning.seed = seed;
    }
    if args.dump_tuning {
        println!("{}", tuning.to_json()?);
        return Ok(());
    }

    log::info!(
        "Witch Run (headless) seed={} frames={} runs={}",
        tuning.seed,
        args.frames,
        args.runs
    );

    let dt = tuning.expected_frame_time;
    let mut session = GameSession::try_new(tuning).context("invalid tuning")?;
    let mut scene = HeadlessScene::new();
    let mut started = 0u32;
    let mut ended = 0u32;
    let mut gems = 0u32;

    for frame in 0..args.frames {
        let now = frame as f64 * dt;
        let tap = if session.is_running() {
            !args.no_autoplay && should_jump(&session)
        } else {
            started < args.runs
        };

        tick(&mut session, &mut scene, &TickInput { tap }, now);
        scene.step_physics(&mut session, dt as f32);

        for event in session.drain_events() {
            match event {
                GameEvent::GameStarted => started += 1,
                GameEvent::GemCollected { .. } => gems += 1,
                GameEvent::GameOver {
                    score,
                    new_high_score,
                } => {
                    ended += 1;
                    println!(
                        "run {ended}: score {score}{} after {:.1}s, {:.0} points travelled",
                        if new_high_score { " (new high score)" } else { "" },
                        session.time_ticks as f64 * dt,
                        session.distance,
                    );
                }
                _ => {}
            }
        }

        if ended >= args.runs {
            break;
        }
    }

    let hud = HudText::from_session(&session);
    println!(
        "score {}  high {}  gems {}  visuals spawned {} removed {}",
        hud.score,
        hud.high_score,
        gems,
        scene.spawned(),
        scene.removed()
    );
    Ok(())
}

/// Jump when the ground just ahead is missing or higher than the feet
fn should_jump(session: &GameSession) -> bool {
    let player = &session.player;
    if !player.on_ground {
        return false;
    }
    let feet = player.position.y - player.size.y / 2.0;
    let probe_x =
        player.position.x + player.size.x / 2.0 + session.scroll_speed * LOOKAHEAD_FRAMES;
    let reach = session.tuning.segment_margin;

    let support = session
        .ground
        .segments
        .iter()
        .find(|s| (s.position.x - probe_x).abs() <= s.size.x / 2.0 + reach);
    match support {
        None => true,
        Some(segment) => segment.position.y + segment.size.y / 2.0 > feet + 1.0,
    }
}
