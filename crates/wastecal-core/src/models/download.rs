use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

use super::ZoneCode;

/// Link to the official collection plans, with `{year}`, `{result_type}`
/// and `{zone}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UrlTemplate {
    pub template: String,
    /// Describes the placeholders; informational only.
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl UrlTemplate {
    pub fn render(&self, year: i32, result_type: &str, zone: &ZoneCode) -> String {
        self.template
            .replace("{year}", &year.to_string())
            .replace("{result_type}", result_type)
            .replace("{zone}", zone.as_str())
    }
}

/// Response of `/api/waste-collection/download-links-availability`.
///
/// `availability` is a year × format matrix telling which plan documents
/// exist, e.g. `{ "2025": { "Listen": true, "Kalender": false } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DownloadLinks {
    pub reference_date: String,
    #[serde(default)]
    pub result_types: Vec<String>,
    pub url_template: UrlTemplate,
    #[serde(default)]
    pub availability: BTreeMap<i32, BTreeMap<String, bool>>,
}

impl DownloadLinks {
    pub fn years(&self) -> Vec<i32> {
        self.availability.keys().copied().collect()
    }

    /// A year is offered when at least one format exists for it.
    pub fn is_year_available(&self, year: i32) -> bool {
        self.availability
            .get(&year)
            .is_some_and(|formats| formats.values().any(|&available| available))
    }

    pub fn is_available(&self, year: i32, result_type: &str) -> bool {
        self.availability
            .get(&year)
            .and_then(|formats| formats.get(result_type))
            .copied()
            .unwrap_or(false)
    }

    /// The document URL, only for an available year/format combination.
    pub fn download_url(&self, year: i32, result_type: &str, zone: &ZoneCode) -> Option<String> {
        self.is_available(year, result_type)
            .then(|| self.url_template.render(year, result_type, zone))
    }

    /// Every available link for a zone as `(year, format, url)`.
    pub fn links_for(&self, zone: &ZoneCode) -> Vec<(i32, &str, String)> {
        let mut links = Vec::new();
        for (&year, formats) in &self.availability {
            for result_type in &self.result_types {
                if formats.get(result_type).copied().unwrap_or(false) {
                    links.push((year, result_type.as_str(), self.url_template.render(year, result_type, zone)));
                }
            }
        }
        links
    }
}

impl Resource for DownloadLinks {
    const KIND: ResourceKind = ResourceKind::DownloadLinks;

    fn reference_date(&self) -> Option<&str> {
        Some(&self.reference_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DownloadLinks {
        let json = r#"{
            "reference_date": "2025-08-07",
            "result_types": ["Listen", "Kalender"],
            "url_template": {
                "template": "https://example.org/plans/{year}/{result_type}_{zone}.pdf",
                "parameters": {"year": 2025, "result_type": "Listen", "zone": "A1"}
            },
            "availability": {
                "2026": {"Listen": false, "Kalender": false},
                "2025": {"Listen": true, "Kalender": false}
            }
        }"#;
        serde_json::from_str(json).expect("Failed to parse download links")
    }

    #[test]
    fn test_years_sorted() {
        assert_eq!(sample().years(), vec![2025, 2026]);
    }

    #[test]
    fn test_year_availability() {
        let links = sample();
        assert!(links.is_year_available(2025));
        assert!(!links.is_year_available(2026));
        assert!(!links.is_year_available(1999));
    }

    #[test]
    fn test_download_url_only_when_available() {
        let links = sample();
        let zone = ZoneCode::parse("C2").unwrap();
        assert_eq!(
            links.download_url(2025, "Listen", &zone).as_deref(),
            Some("https://example.org/plans/2025/Listen_C2.pdf")
        );
        assert_eq!(links.download_url(2025, "Kalender", &zone), None);
        assert_eq!(links.download_url(2026, "Listen", &zone), None);
        assert_eq!(links.download_url(2025, "Unbekannt", &zone), None);
    }

    #[test]
    fn test_links_for() {
        let zone = ZoneCode::parse("A1").unwrap();
        let links = sample();
        let all = links.links_for(&zone);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, 2025);
        assert_eq!(all[0].1, "Listen");
    }
}
