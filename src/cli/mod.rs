//! CLI module for Batch Nearby Search
//!
//! Every subcommand prints pretty JSON on stdout; logs go to stderr:
//! - `search` / `batch`: places of given types around one or many locations
//! - `geocode` / `reverse-geocode`: concurrent address and coordinate lookups
//! - `distance-matrix`: travel distance and time between places
//! - `place-types`: browse or check the place-type catalog

pub mod distance;
pub mod geocode;
pub mod place_types;
pub mod search;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{Coordinate, DomainError, LocationQuery};
use crate::infrastructure::logging;

/// Batch Nearby Search - places around many locations through one cached, rate-limited client
#[derive(Parser)]
#[command(name = "batch-nearby-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search places around a single location
    Search(search::SearchArgs),

    /// Search places around many locations at once
    Batch(search::BatchArgs),

    /// Geocode one or more addresses
    Geocode(geocode::GeocodeArgs),

    /// Reverse geocode one or more "lat,lng" coordinates
    ReverseGeocode(geocode::ReverseGeocodeArgs),

    /// Distances and travel times between origins and destinations
    DistanceMatrix(distance::DistanceMatrixArgs),

    /// List or check supported place types (no API key needed)
    PlaceTypes(place_types::PlaceTypesArgs),
}

/// Locations given on the command line or in a JSON file
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// "lat,lng" or a street address; repeatable
    #[arg(short, long = "location")]
    pub locations: Vec<String>,

    /// JSON array of {"address": ...} or {"lat": ..., "lng": ...} objects
    #[arg(long)]
    pub locations_file: Option<PathBuf>,
}

impl LocationArgs {
    /// Flags first, then file entries
    pub fn resolve(&self) -> anyhow::Result<Vec<LocationQuery>> {
        let mut locations = self
            .locations
            .iter()
            .map(|arg| parse_location_arg(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(path) = &self.locations_file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let from_file: Vec<LocationQuery> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid locations file {}", path.display()))?;
            locations.extend(from_file);
        }

        Ok(locations)
    }
}

/// Reads `"lat,lng"` as a coordinate and anything else as an address
pub fn parse_location_arg(arg: &str) -> Result<LocationQuery, DomainError> {
    match parse_lat_lng(arg) {
        Some((lat, lng)) => LocationQuery::coordinate(lat, lng),
        None => LocationQuery::address(arg),
    }
}

/// Parses a `"lat,lng"` argument into a validated coordinate
pub fn parse_coordinate_arg(arg: &str) -> Result<Coordinate, DomainError> {
    let (lat, lng) = parse_lat_lng(arg).ok_or_else(|| {
        DomainError::validation(format!("Expected \"lat,lng\", got '{}'", arg))
    })?;
    Coordinate::new(lat, lng)
}

fn parse_lat_lng(arg: &str) -> Option<(f64, f64)> {
    let (lat, lng) = arg.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    Some((lat, lng))
}

/// Loads `.env` and the layered configuration, then starts logging
pub(crate) fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    Ok(config)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
