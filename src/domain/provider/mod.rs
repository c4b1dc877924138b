//! Upstream provider port

mod port;

#[cfg(test)]
pub mod fake;

pub use port::{NearbyRequest, PlacesProvider, RawPlace};

#[cfg(test)]
pub use port::MockPlacesProvider;
