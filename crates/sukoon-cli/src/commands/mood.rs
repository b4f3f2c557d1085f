use clap::Subcommand;
use serde_json::json;
use sukoon_core::wellness::trends;
use sukoon_core::{DayKey, Mood, WellnessState};

use super::{open_wellness, parse_day, print_json, CmdResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record how you feel (great, good, okay, bad, awful)
    Set {
        mood: Mood,
        /// Optional note
        #[arg(long, default_value = "")]
        note: String,
        /// Day to record (today, yesterday or YYYY-MM-DD)
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// Remove the mood recorded for a day
    Delete {
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// Show the mood recorded for a day
    Show {
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// List recorded moods, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Averages, distribution and current streak
    Stats,
}

pub fn run(action: MoodAction) -> CmdResult {
    let store = open_wellness()?;

    match action {
        MoodAction::Set { mood, note, date } => {
            let mut state = WellnessState::load(store);
            state.save_mood(date, mood, &note)?;
            if let Some(notice) = state.notice() {
                eprintln!("{}", notice.message);
            }
            if let Some(entry) = state.mood_for(date) {
                print_json(entry)?;
            }
        }
        MoodAction::Delete { date } => {
            store.delete_mood(date)?;
            println!("mood for {date} deleted");
        }
        MoodAction::Show { date } => match store.mood_for(date) {
            Some(entry) => print_json(&entry)?,
            None => {
                eprintln!("no mood recorded for {date}");
                std::process::exit(1);
            }
        },
        MoodAction::List { limit } => {
            let mut history = store.load_mood_history();
            history.sort_by(|a, b| b.date.cmp(&a.date));
            if let Some(limit) = limit {
                history.truncate(limit);
            }
            print_json(&history)?;
        }
        MoodAction::Stats => {
            let history = store.load_mood_history();
            print_json(&json!({
                "entries": history.len(),
                "average_score": trends::average_score(&history),
                "current_streak": trends::current_streak(&history, DayKey::today()),
                "distribution": trends::distribution(&history),
                "weekly": trends::weekly_averages(&history),
            }))?;
        }
    }
    Ok(())
}
