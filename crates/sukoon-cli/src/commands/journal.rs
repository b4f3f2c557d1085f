use std::io::Read;

use clap::Subcommand;
use sukoon_core::{DayKey, WellnessState};

use super::{open_wellness, parse_day, print_json, CmdResult};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Write (or replace) the entry for a day
    Write {
        /// Entry text; read from stdin when omitted
        content: Option<String>,
        /// Title; defaults to "Journal Entry - <date>"
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// Show the entry for a day
    Show {
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// Remove the entry for a day
    Delete {
        #[arg(long, default_value = "today", value_parser = parse_day)]
        date: DayKey,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn run(action: JournalAction) -> CmdResult {
    let store = open_wellness()?;

    match action {
        JournalAction::Write {
            content,
            title,
            date,
        } => {
            let content = match content {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let mut state = WellnessState::load(store);
            state.save_journal(date, &title, content.trim_end())?;
            if let Some(notice) = state.notice() {
                eprintln!("{}", notice.message);
            }
            if let Some(entry) = state.journal_for(date) {
                print_json(entry)?;
            }
        }
        JournalAction::Show { date } => match store.journal_for(date) {
            Some(entry) => {
                println!("{}\n{}\n\n{}", entry.title, entry.date.long_format(), entry.content);
            }
            None => {
                eprintln!("no journal entry for {date}");
                std::process::exit(1);
            }
        },
        JournalAction::Delete { date } => {
            store.delete_journal_entry(date)?;
            println!("journal entry for {date} deleted");
        }
        JournalAction::List { limit } => {
            let mut entries = store.load_journal_entries();
            entries.sort_by(|a, b| b.date.cmp(&a.date));
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            print_json(&entries)?;
        }
    }
    Ok(())
}
