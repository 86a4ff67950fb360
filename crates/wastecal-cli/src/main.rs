//! wastecal - waste collection dates in the terminal.
//!
//! Looks up upcoming collections, calendars and printable plans for a zone
//! or street. Responses are cached on disk and reused while they are still
//! valid for the requested zone and day.

mod cli;
mod output;

use std::collections::BTreeMap;
use std::io;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wastecal_core::{ApiError, Config, Language, StreetZoneMapping, WasteClient, ZoneCode};

use cli::{resolve_zone, Cli, Command};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with `--json` output. The returned
/// guard flushes pending lines on drop and must outlive all logging.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=wastecal_core=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = tracing_appender::non_blocking(io::stderr());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error) {
    let rate_limited = err
        .downcast_ref::<ApiError>()
        .is_some_and(|e| e.is_rate_limited());
    if rate_limited {
        eprintln!("Error: too many requests, try again in a moment");
    } else {
        eprintln!("Error: {:#}", err);
    }
}

/// Print either the raw payload or its text rendering.
fn emit<T: Serialize>(json: bool, payload: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(payload)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Persist `zone` as the default for the next run. Failure only costs the
/// convenience, so it is logged rather than returned.
fn remember_zone(stored: &mut Config, zone: &ZoneCode) {
    if stored.last_zone.as_ref() == Some(zone) {
        return;
    }
    stored.last_zone = Some(zone.clone());
    match stored.save() {
        Ok(()) => debug!(zone = %zone, "Remembered zone"),
        Err(e) => warn!(error = %e, "Failed to save config"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Environment overrides apply to this run only and are never saved
    let mut stored = Config::load()?;
    let mut config = stored.clone();
    config.apply_env();

    let lang = cli.lang.unwrap_or(config.language);
    let client = WasteClient::from_config(&config)?;
    debug!(api = %config.api_base_url, command = ?cli.command, "Starting");

    match &cli.command {
        Command::Next { .. } | Command::Schedule { .. } | Command::Downloads { .. } => {
            let zone = resolve_zone(cli.command.zone_arg(), &config)?;
            show_zone(&cli, &client, &zone, lang).await?;
            remember_zone(&mut stored, &zone);
        }
        Command::Street { name } => {
            if cli.refresh {
                client.fetch_street_zone_mapping().await?;
            }
            let Some(zone) = client.zone_for_street(name).await? else {
                let mapping = client.street_zone_mapping().await?;
                let suggestions: Vec<&str> = mapping.search(name).into_iter().take(5).collect();
                if suggestions.is_empty() {
                    bail!("Unknown street '{}'", name);
                }
                bail!("Unknown street '{}'. Did you mean: {}?", name, suggestions.join(", "));
            };
            let next = if cli.refresh {
                client.fetch_next_pickups(&zone).await?
            } else {
                client.next_pickups(&zone).await?
            };
            emit(cli.json, &next, || output::next_pickups(&next, &client.today(), lang))?;
            remember_zone(&mut stored, &zone);
        }
        Command::Streets { filter } => {
            let mapping = if cli.refresh {
                client.fetch_street_zone_mapping().await?
            } else {
                client.street_zone_mapping().await?
            };
            let filter = filter.as_deref();
            if cli.json {
                let selected: BTreeMap<String, String> = match filter {
                    Some(fragment) => mapping
                        .search(fragment)
                        .into_iter()
                        .filter_map(|name| mapping.0.get_key_value(name))
                        .map(|(name, zone)| (name.clone(), zone.clone()))
                        .collect(),
                    None => mapping.0.clone(),
                };
                emit(true, &StreetZoneMapping(selected), String::new)?;
            } else {
                print!("{}", output::streets(&mapping, filter, lang));
            }
        }
    }
    Ok(())
}

async fn show_zone(cli: &Cli, client: &WasteClient, zone: &ZoneCode, lang: Language) -> Result<()> {
    let today = client.today();
    match cli.command {
        Command::Next { .. } => {
            let next = if cli.refresh {
                client.fetch_next_pickups(zone).await?
            } else {
                client.next_pickups(zone).await?
            };
            emit(cli.json, &next, || output::next_pickups(&next, &today, lang))?;
            if !cli.json {
                if let Some(entry) = client.cached_next_pickups(zone) {
                    println!("{}", output::updated(&entry.age_display(client.now()), lang));
                }
            }
        }
        Command::Schedule { .. } => {
            let schedule = if cli.refresh {
                client.fetch_schedule(zone).await?
            } else {
                client.schedule(zone).await?
            };
            emit(cli.json, &schedule, || output::schedule(&schedule, &today, lang))?;
            if !cli.json {
                if let Some(entry) = client.cached_schedule(zone) {
                    println!("{}", output::updated(&entry.age_display(client.now()), lang));
                }
            }
        }
        Command::Downloads { .. } => {
            let links = if cli.refresh {
                client.fetch_download_links().await?
            } else {
                client.download_links().await?
            };
            emit(cli.json, &links, || output::downloads(&links, zone, lang))?;
        }
        Command::Street { .. } | Command::Streets { .. } => {}
    }
    Ok(())
}
