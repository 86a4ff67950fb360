//! Plain-text rendering of API payloads.
//!
//! Every function returns the text instead of printing it so the layout can
//! be tested.

use std::fmt::Write;

use wastecal_core::utils::{day_name, days_until, format_date, relative_day, truncate_string};
use wastecal_core::{DownloadLinks, Language, NextPickups, Schedule, StreetZoneMapping, ZoneCode};

/// Street names longer than this are shortened in listings.
const STREET_COLUMN_WIDTH: usize = 32;

fn label(lang: Language, en: &'static str, de: &'static str) -> &'static str {
    match lang {
        Language::En => en,
        Language::De => de,
    }
}

/// "Friday, 08/08/2025 (today)"-style date line.
fn date_line(date: &str, today: &str, lang: Language) -> String {
    let mut line = String::new();
    if let Some(day) = day_name(date, lang) {
        line.push_str(day);
        line.push_str(", ");
    }
    line.push_str(&format_date(date, lang));
    if let Some(days) = days_until(date, today) {
        let _ = write!(line, " ({})", relative_day(days, lang));
    }
    line
}

pub fn next_pickups(next: &NextPickups, today: &str, lang: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", label(lang, "Zone", "Bezirk"), next.zone);

    if next.is_empty() {
        let _ = writeln!(out, "{}", label(lang, "No upcoming collections.", "Keine anstehenden Abholungen."));
        return out;
    }

    let mut pickups: Vec<_> = next.next_pickups.iter().collect();
    pickups.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.waste_type.cmp(&b.waste_type)));
    for pickup in pickups {
        let _ = writeln!(out, "  {:<16} {}", pickup.waste_type, date_line(&pickup.date, today, lang));
    }
    out
}

pub fn schedule(schedule: &Schedule, today: &str, lang: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}: {}",
        label(lang, "Collection calendar, zone", "Abfuhrkalender, Bezirk"),
        schedule.zone,
        schedule.waste_types().join(", ")
    );

    let mut any = false;
    for (date, types) in schedule.upcoming(today) {
        any = true;
        let _ = writeln!(out, "  {:<34} {}", date_line(date, today, lang), types.join(", "));
    }
    if !any {
        let _ = writeln!(out, "{}", label(lang, "No upcoming collections.", "Keine anstehenden Abholungen."));
    }
    out
}

pub fn streets(mapping: &StreetZoneMapping, filter: Option<&str>, lang: Language) -> String {
    let names: Vec<&str> = match filter {
        Some(fragment) => mapping.search(fragment),
        None => mapping.streets().collect(),
    };

    let mut out = String::new();
    if names.is_empty() {
        let _ = writeln!(out, "{}", label(lang, "No matching streets.", "Keine passenden Straßen."));
        return out;
    }
    for name in names {
        let zone = mapping.0.get(name).map(String::as_str).unwrap_or("?");
        let _ = writeln!(
            out,
            "{:<width$} {}",
            truncate_string(name, STREET_COLUMN_WIDTH),
            zone,
            width = STREET_COLUMN_WIDTH
        );
    }
    out
}

pub fn downloads(links: &DownloadLinks, zone: &ZoneCode, lang: Language) -> String {
    let mut out = String::new();
    let available = links.links_for(zone);
    if available.is_empty() {
        let _ = writeln!(
            out,
            "{} {}.",
            label(lang, "No collection plans available for zone", "Keine Abfuhrpläne verfügbar für Bezirk"),
            zone
        );
        return out;
    }
    for (year, result_type, url) in available {
        let _ = writeln!(out, "{} {:<10} {}", year, result_type, url);
    }
    out
}

/// Trailing note on how old cached data is, e.g. "Updated 5m ago".
pub fn updated(age: &str, lang: Language) -> String {
    format!("{} {}", label(lang, "Updated", "Stand:"), age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wastecal_core::models::Pickup;

    const TODAY: &str = "2025-08-08";

    #[test]
    fn test_next_pickups_sorted_with_relative_days() {
        let next = NextPickups {
            zone: "B1".to_string(),
            reference_date: TODAY.to_string(),
            next_pickups: vec![
                Pickup {
                    waste_type: "Papier".to_string(),
                    date: "2025-08-11".to_string(),
                },
                Pickup {
                    waste_type: "Restmüll".to_string(),
                    date: "2025-08-08".to_string(),
                },
            ],
        };

        let text = next_pickups(&next, TODAY, Language::De);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Bezirk B1");
        assert!(lines[1].contains("Restmüll") && lines[1].contains("Freitag, 08.08.2025 (heute)"));
        assert!(lines[2].contains("Papier") && lines[2].contains("Montag, 11.08.2025 (in 3 Tagen)"));
    }

    #[test]
    fn test_next_pickups_empty() {
        let next = NextPickups {
            zone: "E4".to_string(),
            reference_date: TODAY.to_string(),
            next_pickups: Vec::new(),
        };
        assert!(next_pickups(&next, TODAY, Language::En).contains("No upcoming collections."));
    }

    #[test]
    fn test_schedule_skips_past_days() {
        let schedule_data = Schedule {
            zone: "C2".to_string(),
            reference_date: TODAY.to_string(),
            schedule: BTreeMap::from([
                ("2025-08-01".to_string(), vec!["Glas".to_string()]),
                ("2025-08-09".to_string(), vec!["Biomüll".to_string(), "Papier".to_string()]),
            ]),
        };

        let text = schedule(&schedule_data, TODAY, Language::En);
        assert!(text.starts_with("Collection calendar, zone C2: Biomüll, Glas, Papier"));
        assert!(text.contains("Saturday, 08/09/2025 (tomorrow)"));
        assert!(text.contains("Biomüll, Papier"));
        assert!(!text.contains("08/01/2025"));
    }

    #[test]
    fn test_streets_filtered() {
        let mapping = StreetZoneMapping(BTreeMap::from([
            ("Hauptstraße".to_string(), "A1".to_string()),
            ("Am Hauptbahnhof".to_string(), "B2".to_string()),
            ("Lindenweg".to_string(), "D4".to_string()),
        ]));

        let text = streets(&mapping, Some("haupt"), Language::De);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("A1"));
        assert!(!text.contains("Lindenweg"));

        assert!(streets(&mapping, Some("xyz"), Language::En).contains("No matching streets."));
    }

    #[test]
    fn test_updated_label() {
        assert_eq!(updated("5m ago", Language::En), "Updated 5m ago");
    }
}
