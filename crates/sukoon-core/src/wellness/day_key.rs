use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Calendar-day key for mood and journal entries.
///
/// Two timestamps on the same local day map to the same key. Serialized as
/// `YYYY-MM-DD`; RFC 3339 timestamps are accepted on input and reduced to
/// their local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The day `dt` falls on in its own time zone.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.date_naive())
    }

    pub fn today() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn pred(&self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }

    pub fn succ(&self) -> Self {
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    /// Monday of this day's ISO week.
    pub fn week_start(&self) -> Self {
        let back = u64::from(self.0.weekday().num_days_from_monday());
        Self(self.0.checked_sub_days(Days::new(back)).unwrap_or(self.0))
    }

    /// Long human form, e.g. `Mar 1, 2024`.
    pub fn long_format(&self) -> String {
        self.0.format("%b %-d, %Y").to_string()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_datetime(&dt.with_timezone(&Local)))
            .map_err(|_| ValidationError::InvalidValue {
                field: "date".into(),
                message: format!("'{s}' is not a YYYY-MM-DD date"),
            })
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn parses_iso_dates() {
        let day: DayKey = "2024-03-01".parse().unwrap();
        assert_eq!(day, DayKey::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(day.to_string(), "2024-03-01");
        assert_eq!(day.long_format(), "Mar 1, 2024");
    }

    #[test]
    fn rejects_garbage() {
        assert!("yesterday-ish".parse::<DayKey>().is_err());
        assert!("2024-02-30".parse::<DayKey>().is_err());
    }

    #[test]
    fn same_day_timestamps_share_a_key() {
        let tz = FixedOffset::east_opt(5 * 3600).unwrap();
        let morning = tz.with_ymd_and_hms(2024, 3, 1, 0, 5, 0).unwrap();
        let night = tz.with_ymd_and_hms(2024, 3, 1, 23, 55, 0).unwrap();
        assert_eq!(DayKey::from_datetime(&morning), DayKey::from_datetime(&night));
        assert_ne!(
            DayKey::from_datetime(&night),
            DayKey::from_datetime(&(night + chrono::Duration::minutes(10)))
        );
    }

    #[test]
    fn rfc3339_input_is_reduced_to_local_day() {
        let now = Local::now();
        let stamp = now.with_timezone(&Utc).to_rfc3339();
        assert_eq!(stamp.parse::<DayKey>().unwrap(), DayKey::from_datetime(&now));
    }

    #[test]
    fn serde_uses_plain_date_strings() {
        let day = DayKey::from_ymd(2024, 12, 31).unwrap();
        assert_eq!(serde_json::to_string(&day).unwrap(), "\"2024-12-31\"");
        let back: DayKey = serde_json::from_str("\"2024-12-31\"").unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn neighbours_and_week_start() {
        let day = DayKey::from_ymd(2024, 3, 1).unwrap(); // Friday
        assert_eq!(day.pred().to_string(), "2024-02-29");
        assert_eq!(day.succ().to_string(), "2024-03-02");
        assert_eq!(day.week_start().to_string(), "2024-02-26");
    }
}
