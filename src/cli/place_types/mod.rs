//! Place-type catalog command

use clap::Args;

use super::print_json;
use crate::domain::place::{list_place_types, validate_place_types};

/// Arguments for the place-types command
#[derive(Args, Debug, Clone)]
pub struct PlaceTypesArgs {
    /// Only list these categories; repeatable
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Check place types instead of listing, reporting suggestions for typos
    #[arg(long, value_delimiter = ',')]
    pub check: Vec<String>,
}

/// Print the catalog or a validation report
pub async fn run(args: PlaceTypesArgs) -> anyhow::Result<()> {
    if !args.check.is_empty() {
        return print_json(&validate_place_types(&args.check));
    }

    let categories = (!args.categories.is_empty()).then_some(args.categories.as_slice());
    print_json(&list_place_types(categories))
}
