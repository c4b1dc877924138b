use batch_nearby_search::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Search(args) => cli::search::run_search(args).await,
        Command::Batch(args) => cli::search::run_batch(args).await,
        Command::Geocode(args) => cli::geocode::run_geocode(args).await,
        Command::ReverseGeocode(args) => cli::geocode::run_reverse_geocode(args).await,
        Command::DistanceMatrix(args) => cli::distance::run(args).await,
        Command::PlaceTypes(args) => cli::place_types::run(args).await,
    }
}
