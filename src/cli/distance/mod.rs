//! Distance matrix command

use clap::Args;
use serde::Serialize;

use super::{init, print_json};
use crate::domain::place::{DistanceMatrixEntry, TravelMode};

/// Arguments for the distance-matrix command
#[derive(Args, Debug, Clone)]
pub struct DistanceMatrixArgs {
    /// Origin address or "lat,lng"; repeatable
    #[arg(short, long = "origin", required = true)]
    pub origins: Vec<String>,

    /// Destination address or "lat,lng"; repeatable
    #[arg(short, long = "destination", required = true)]
    pub destinations: Vec<String>,

    /// driving, walking, bicycling or transit
    #[arg(short, long, default_value = "driving")]
    pub mode: TravelMode,
}

#[derive(Debug, Serialize)]
struct DistanceMatrixOutput {
    mode: TravelMode,
    entries: Vec<DistanceMatrixEntry>,
}

/// Run the distance matrix lookup
pub async fn run(args: DistanceMatrixArgs) -> anyhow::Result<()> {
    let config = init()?;
    let state = crate::create_app_state(&config)?;

    let matrix = state
        .places
        .distance_matrix(args.origins, args.destinations, args.mode)
        .await?;

    print_json(&DistanceMatrixOutput {
        mode: matrix.mode,
        entries: matrix.entries(),
    })
}
