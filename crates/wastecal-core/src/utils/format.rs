use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::DATE_FORMAT;

/// Display language for dates and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    De,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::De => write!(f, "de"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            other => Err(format!("Unsupported language '{}' (expected en or de)", other)),
        }
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.get(..10)?, DATE_FORMAT).ok()
}

/// Format a `YYYY-MM-DD` date: `DD.MM.YYYY` in German, `MM/DD/YYYY` in English.
/// Anything unparseable is returned unchanged.
pub fn format_date(date: &str, lang: Language) -> String {
    match parse_date(date) {
        Some(d) => match lang {
            Language::En => d.format("%m/%d/%Y").to_string(),
            Language::De => d.format("%d.%m.%Y").to_string(),
        },
        None => date.to_string(),
    }
}

/// Full weekday name of a `YYYY-MM-DD` date.
pub fn day_name(date: &str, lang: Language) -> Option<&'static str> {
    let weekday = parse_date(date)?.weekday();
    Some(match lang {
        Language::En => match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
        Language::De => match weekday {
            Weekday::Mon => "Montag",
            Weekday::Tue => "Dienstag",
            Weekday::Wed => "Mittwoch",
            Weekday::Thu => "Donnerstag",
            Weekday::Fri => "Freitag",
            Weekday::Sat => "Samstag",
            Weekday::Sun => "Sonntag",
        },
    })
}

/// Whole days from `today` to `date`; negative for past dates.
pub fn days_until(date: &str, today: &str) -> Option<i64> {
    Some((parse_date(date)? - parse_date(today)?).num_days())
}

/// "today" / "tomorrow" / "in 3 days" in the chosen language.
pub fn relative_day(days: i64, lang: Language) -> String {
    match (lang, days) {
        (Language::En, 0) => "today".to_string(),
        (Language::En, 1) => "tomorrow".to_string(),
        (Language::En, n) if n > 1 => format!("in {} days", n),
        (Language::En, n) => format!("{} days ago", -n),
        (Language::De, 0) => "heute".to_string(),
        (Language::De, 1) => "morgen".to_string(),
        (Language::De, n) if n > 1 => format!("in {} Tagen", n),
        (Language::De, n) => format!("vor {} Tagen", -n),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
