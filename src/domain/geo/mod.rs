mod coordinate;
mod distance;

pub use coordinate::{round_to, Coordinate, LocationInput, LocationQuery, COORDINATE_KEY_PRECISION};
pub use distance::{haversine_distance, EARTH_RADIUS_METERS};
