use std::time::Duration;

use clap::Subcommand;
use serde_json::json;
use sukoon_core::{BreathingPattern, BreathingTimer, Config, Event, Phase, SystemClock};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Run a guided session in the terminal (Ctrl-C pauses and exits)
    Start {
        /// Pattern name or slug (box, 4-7-8, relaxing)
        #[arg(long)]
        pattern: Option<String>,
        /// Session length in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
        minutes: Option<u32>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List the built-in patterns
    Patterns,
    /// Show the phases and cycle count a session would use
    Plan {
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
        minutes: Option<u32>,
    },
}

fn resolve(config: &Config, pattern: Option<String>) -> Result<BreathingPattern, sukoon_core::BreathingError> {
    match pattern {
        Some(name) => BreathingPattern::preset(&name),
        None => config.breathing_pattern(),
    }
}

fn print_event(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }
    match event {
        Event::BreathingStarted {
            pattern,
            duration_minutes,
            target_cycles,
            ..
        } => println!("{pattern}: {target_cycles} cycles over {duration_minutes} min"),
        Event::PhaseChanged { to, duration_secs, .. } => {
            println!("  {} ({duration_secs}s)", to.instruction());
        }
        Event::CycleCompleted {
            completed_cycles,
            target_cycles,
            ..
        } => println!("cycle {completed_cycles}/{target_cycles}"),
        Event::BreathingFinished { completed_cycles, .. } => {
            println!("Session complete: {completed_cycles} cycles. Well done.");
        }
        Event::BreathingPaused { completed_cycles, .. } => {
            println!("Paused after {completed_cycles} cycles.");
        }
        _ => {}
    }
}

async fn start(pattern: BreathingPattern, minutes: u32, tick_ms: u64, json: bool) -> CmdResult {
    let mut timer = BreathingTimer::new(pattern, SystemClock)?;
    timer.subscribe(move |event| print_event(event, json));
    timer.start(minutes);

    let session = timer.session();
    if json {
        print_event(&session.snapshot(), true);
    } else {
        let first = session.phase();
        println!(
            "  {} ({}s)",
            first.instruction(),
            session.pattern().phase_secs(first)
        );
    }

    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                timer.poll();
                if timer.session().is_finished() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                timer.stop();
                break;
            }
        }
    }
    Ok(())
}

pub async fn run(action: BreatheAction) -> CmdResult {
    let config = Config::load_or_default();

    match action {
        BreatheAction::Start {
            pattern,
            minutes,
            json,
        } => {
            let pattern = resolve(&config, pattern)?;
            let minutes = minutes.unwrap_or(config.breathing.duration_minutes);
            start(pattern, minutes, config.breathing.tick_ms, json).await?;
        }
        BreatheAction::Patterns => {
            print_json(&BreathingPattern::presets())?;
        }
        BreatheAction::Plan { pattern, minutes } => {
            let pattern = resolve(&config, pattern)?;
            let minutes = minutes.unwrap_or(config.breathing.duration_minutes);
            let phases: Vec<_> = Phase::ALL
                .iter()
                .filter(|p| pattern.is_active(**p))
                .map(|p| json!({ "phase": p, "instruction": p.instruction(), "secs": pattern.phase_secs(*p) }))
                .collect();
            print_json(&json!({
                "pattern": pattern.name,
                "duration_minutes": minutes,
                "cycle_secs": pattern.cycle_secs(),
                "target_cycles": pattern.target_cycles(minutes),
                "phases": phases,
            }))?;
        }
    }
    Ok(())
}
