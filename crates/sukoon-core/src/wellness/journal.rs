use serde::{Deserialize, Serialize};

use super::day_key::DayKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: DayKey,
    pub title: String,
    pub content: String,
}

/// Title used when the user leaves it blank.
pub fn default_title(day: DayKey) -> String {
    format!("Journal Entry - {}", day.long_format())
}

/// Trimmed `title`, or the default for `day` when it is blank.
pub fn resolve_title(day: DayKey, title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        default_title(day)
    } else {
        trimmed.to_string()
    }
}
