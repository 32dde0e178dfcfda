//! Runtime caches used by application services.
//!
//! - [`price::PriceCache`]: Latest quote snapshot, swapped wholesale on refresh

pub mod price;

pub use price::PriceCache;
