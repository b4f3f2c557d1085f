use clap::Args;
use sukoon_core::{AffirmationBook, DayKey, SqliteStore};

use super::CmdResult;

#[derive(Args)]
pub struct AffirmationArgs {
    /// Pick a new affirmation for today
    #[arg(long)]
    refresh: bool,
}

pub fn run(args: AffirmationArgs) -> CmdResult {
    let book = AffirmationBook::new(SqliteStore::open_default()?);
    let today = DayKey::today();
    let text = if args.refresh {
        book.refresh(today)
    } else {
        book.today(today)
    };
    println!("{text}");
    Ok(())
}
