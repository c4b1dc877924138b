//! Lookup commands - geocoding and reverse geocoding in bulk

use clap::Args;

use super::{init, parse_coordinate_arg, print_json};

/// Arguments for the geocode command
#[derive(Args, Debug, Clone)]
pub struct GeocodeArgs {
    /// Addresses to geocode
    #[arg(required = true)]
    pub addresses: Vec<String>,
}

/// Arguments for the reverse-geocode command
#[derive(Args, Debug, Clone)]
pub struct ReverseGeocodeArgs {
    /// Coordinates as "lat,lng"
    #[arg(required = true, allow_hyphen_values = true)]
    pub coordinates: Vec<String>,
}

/// Geocode every address
pub async fn run_geocode(args: GeocodeArgs) -> anyhow::Result<()> {
    let config = init()?;
    let state = crate::create_app_state(&config)?;

    let response = state.search.geocode_batch(args.addresses).await;
    print_json(&response)
}

/// Reverse geocode every coordinate
pub async fn run_reverse_geocode(args: ReverseGeocodeArgs) -> anyhow::Result<()> {
    let config = init()?;
    let coordinates = args
        .coordinates
        .iter()
        .map(|arg| parse_coordinate_arg(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let state = crate::create_app_state(&config)?;
    let response = state.search.reverse_geocode_batch(coordinates).await;
    print_json(&response)
}
