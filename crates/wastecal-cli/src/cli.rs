//! Command-line interface parsing for wastecal.
//!
//! Zones are validated while parsing, so a malformed zone never reaches
//! the network.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use wastecal_core::{Config, Language, ZoneCode};

/// wastecal - Waste collection dates for your zone or street
#[derive(Parser, Debug)]
#[command(name = "wastecal")]
#[command(about = "Waste collection dates for your zone or street")]
#[command(version)]
pub struct Cli {
    /// Ignore cached responses and ask the server
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Print the raw response as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output language (en, de)
    #[arg(long, global = true, value_name = "LANG")]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upcoming collections for a zone
    ///
    /// Without ZONE the last zone used is shown again.
    Next {
        /// Zone code such as B1
        zone: Option<ZoneCode>,
    },
    /// Full collection calendar for a zone
    Schedule {
        /// Zone code such as B1
        zone: Option<ZoneCode>,
    },
    /// Look up a street's zone and show its next collections
    Street {
        /// Street name, e.g. "Hauptstraße"
        name: String,
    },
    /// List streets and their zones
    Streets {
        /// Only streets containing this text (case-insensitive)
        filter: Option<String>,
    },
    /// Printable collection plans for a zone
    Downloads {
        /// Zone code such as B1
        zone: Option<ZoneCode>,
    },
}

impl Command {
    /// The zone given on the command line, if this command takes one.
    pub fn zone_arg(&self) -> Option<&ZoneCode> {
        match self {
            Command::Next { zone } | Command::Schedule { zone } | Command::Downloads { zone } => zone.as_ref(),
            Command::Street { .. } | Command::Streets { .. } => None,
        }
    }
}

/// An explicit zone wins over the remembered one.
pub fn resolve_zone(arg: Option<&ZoneCode>, config: &Config) -> Result<ZoneCode> {
    match arg.or(config.last_zone.as_ref()) {
        Some(zone) => Ok(zone.clone()),
        None => bail!("No zone given and none remembered yet. Pass one, e.g. `wastecal next B1`."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_with_zone() {
        let cli = Cli::parse_from(["wastecal", "next", "B1"]);
        assert_eq!(
            cli.command,
            Command::Next {
                zone: Some(ZoneCode::parse("B1").unwrap())
            }
        );
        assert!(!cli.refresh);
        assert!(!cli.json);
        assert!(cli.lang.is_none());
    }

    #[test]
    fn test_parse_next_without_zone() {
        let cli = Cli::parse_from(["wastecal", "next"]);
        assert_eq!(cli.command, Command::Next { zone: None });
    }

    #[test]
    fn test_invalid_zone_rejected() {
        assert!(Cli::try_parse_from(["wastecal", "schedule", "F9"]).is_err());
        assert!(Cli::try_parse_from(["wastecal", "next", "b1"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wastecal", "schedule", "C3", "--refresh", "--json", "--lang", "en"]);
        assert!(cli.refresh);
        assert!(cli.json);
        assert_eq!(cli.lang, Some(Language::En));
    }

    #[test]
    fn test_invalid_language_rejected() {
        assert!(Cli::try_parse_from(["wastecal", "--lang", "fr", "next"]).is_err());
    }

    #[test]
    fn test_street_requires_name() {
        assert!(Cli::try_parse_from(["wastecal", "street"]).is_err());
        let cli = Cli::parse_from(["wastecal", "street", "Am Ring"]);
        assert_eq!(
            cli.command,
            Command::Street {
                name: "Am Ring".to_string()
            }
        );
    }

    #[test]
    fn test_streets_filter_optional() {
        let cli = Cli::parse_from(["wastecal", "streets"]);
        assert_eq!(cli.command, Command::Streets { filter: None });
        assert!(cli.command.zone_arg().is_none());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["wastecal"]).is_err());
    }

    #[test]
    fn test_resolve_zone_prefers_argument() {
        let config = Config {
            last_zone: Some(ZoneCode::parse("A1").unwrap()),
            ..Default::default()
        };
        let arg = ZoneCode::parse("D2").unwrap();

        assert_eq!(resolve_zone(Some(&arg), &config).unwrap(), arg);
        assert_eq!(resolve_zone(None, &config).unwrap().as_str(), "A1");
    }

    #[test]
    fn test_resolve_zone_without_any_zone() {
        let err = resolve_zone(None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No zone given"));
    }
}
