//! Search commands - places around one or many locations

use clap::Args;

use super::{init, parse_location_arg, print_json, LocationArgs};
use crate::config::AppConfig;
use crate::domain::place::PlaceField;
use crate::domain::{BatchSearchRequest, SearchOptions};

/// Place types and search tuning shared by `search` and `batch`
#[derive(Args, Debug, Clone)]
pub struct SearchOptionArgs {
    /// Place type or category name, e.g. "park" or "food_drink"; repeatable
    #[arg(short, long = "category", required = true)]
    pub categories: Vec<String>,

    /// Search radius in meters (overrides config)
    #[arg(long)]
    pub radius: Option<u32>,

    /// Places kept per category (overrides config)
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Optional place fields to keep, comma separated; all when omitted
    #[arg(long = "fields", value_delimiter = ',')]
    pub fields: Vec<PlaceField>,
}

impl SearchOptionArgs {
    fn options(&self, config: &AppConfig) -> SearchOptions {
        let defaults = config.search_options();
        let options = SearchOptions::new(
            self.radius.unwrap_or(defaults.radius_meters),
            self.max_results.unwrap_or(defaults.max_results_per_category),
        );

        if self.fields.is_empty() {
            options
        } else {
            options.with_include_fields(self.fields.clone())
        }
    }
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// "lat,lng" or a street address
    #[arg(short, long)]
    pub location: String,

    #[command(flatten)]
    pub options: SearchOptionArgs,
}

/// Arguments for the batch command
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub locations: LocationArgs,

    #[command(flatten)]
    pub options: SearchOptionArgs,
}

/// Run a single-location search
pub async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let config = init()?;
    let location = parse_location_arg(&args.location)?;
    let options = args.options.options(&config);

    let state = crate::create_app_state(&config)?;
    let response = state
        .search
        .search(&location, &args.options.categories, &options)
        .await?;

    print_json(&response)
}

/// Run a batch search
pub async fn run_batch(args: BatchArgs) -> anyhow::Result<()> {
    let config = init()?;
    let request = BatchSearchRequest {
        locations: args.locations.resolve()?,
        categories: args.options.categories.clone(),
        options: args.options.options(&config),
    };
    request.validate()?;

    let state = crate::create_app_state(&config)?;
    let response = state
        .search
        .batch_search(&request.locations, &request.categories, &request.options)
        .await?;

    print_json(&response)
}
