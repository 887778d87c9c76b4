//! Headless demo driver: generates the hardcoded chart, runs a fixed-step
//! scripted play session and prints the final score.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use quaver_play::autoplay::{self, ScriptedInput};
use quaver_play::{AutoplayMode, Chart, PlayConfig, PositionUnit, Session};
use quaver_timing::TimingMap;

#[derive(Parser, Debug)]
#[command(name = "quaver", version, about = "Four-lane rhythm game core demo")]
struct Args {
    /// Path to a play config JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chart BPM.
    #[arg(long, default_value_t = 128.0)]
    bpm: f64,

    /// Number of generated quarter notes.
    #[arg(long, default_value_t = 64)]
    notes: u32,

    /// Simulation tick rate in Hz.
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(1..=100_000))]
    tick_hz: u32,

    /// Automate all lanes instead of running without input.
    #[arg(long)]
    autoplay: bool,
}

fn load_config(args: &Args) -> Result<PlayConfig> {
    match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            PlayConfig::from_json(&text)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(PlayConfig::default()),
    }
}

/// Quarter notes cycling through the lanes, starting at bar 2.
fn generate_chart(bpm: f64, notes: u32) -> Result<Chart> {
    let timing = TimingMap::new(bpm, 4, 0.0)?;
    let pairs: Vec<(usize, f64)> = (0..notes)
        .map(|i| ((i % 4) as usize, 4.0 + i as f64))
        .collect();
    Ok(Chart::new(timing, PositionUnit::Beats, &pairs)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let windows = config.hit_windows()?;
    let chart = generate_chart(args.bpm, args.notes)?;

    let mode = if args.autoplay {
        AutoplayMode::Full
    } else {
        AutoplayMode::Off
    };
    let mut input = ScriptedInput::new(if mode.is_enabled() {
        autoplay::build_press_events(&chart)
    } else {
        Vec::new()
    });

    // Run one second past the last note so the final sweep can resolve it.
    let end_sec = chart
        .notes()
        .last()
        .map(|n| chart.song_time_from_position(n.position))
        .unwrap_or(0.0)
        + 1.0;

    info!(
        "running {} notes at {} BPM, {} Hz, autoplay {:?}",
        chart.note_count(),
        args.bpm,
        args.tick_hz,
        mode
    );

    let mut session = Session::new(chart, windows).with_judge_timing_ms(config.judge_timing);
    session.start();

    let step = 1.0 / args.tick_hz as f64;
    let mut frame = 0u64;
    loop {
        let now = frame as f64 * step;
        if now > end_sec {
            break;
        }
        let presses: Vec<usize> = input.poll_up_to(now).iter().map(|e| e.lane).collect();
        session.tick(now, step, &presses)?;
        frame += 1;
    }
    session.stop();

    let score = session.score();
    println!("score      {}", score.score);
    println!("combo      {} (max {})", score.combo, score.max_combo);
    println!(
        "last judge {} ({:.0} ms)",
        score.last_judge.name(),
        score.last_dt_ms
    );
    println!("heat       {:.1} (level {})", score.heat, score.heat_level);
    println!(
        "judgments  {} PERFECT / {} GREAT / {} GOOD / {} BAD / {} MISS",
        score.perfect_count,
        score.great_count,
        score.good_count,
        score.bad_count,
        score.miss_count
    );

    Ok(())
}
