//! Address geocoding backed by a Nominatim-compatible HTTP API.

mod nominatim;

pub use nominatim::NominatimGeocoder;
