//! Place records, upstream result payloads and the place-type catalog

mod record;
pub mod types;

pub use record::{
    AddressComponent, DistanceMatrix, DistanceMatrixElement, DistanceMatrixEntry,
    DistanceMatrixRow, GeocodeResult, PlaceField, PlaceRecord, ReverseGeocodeResult, TravelMode,
};
pub use types::{
    list_place_types, normalize_place_type, suggest_place_types, validate_place_types,
    PlaceTypeListing, PlaceTypeValidation,
};
