pub mod affirmation;
pub mod breathe;
pub mod chat;
pub mod config;
pub mod journal;
pub mod mood;

use sukoon_core::{CoreError, DayKey, SqliteStore, WellnessStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Accepts `today`, `yesterday` or a `YYYY-MM-DD` date.
pub fn parse_day(s: &str) -> Result<DayKey, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        Ok(DayKey::today())
    } else if s.eq_ignore_ascii_case("yesterday") {
        Ok(DayKey::today().pred())
    } else {
        s.parse().map_err(|e: sukoon_core::ValidationError| e.to_string())
    }
}

pub fn open_wellness() -> Result<WellnessStore<SqliteStore>, CoreError> {
    Ok(WellnessStore::new(SqliteStore::open_default()?))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relative_and_iso_days() {
        assert_eq!(parse_day("Today").unwrap(), DayKey::today());
        assert_eq!(parse_day("yesterday").unwrap(), DayKey::today().pred());
        assert_eq!(parse_day("2024-03-01").unwrap().to_string(), "2024-03-01");
        assert!(parse_day("last tuesday").is_err());
    }
}
