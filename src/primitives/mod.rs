//! Deterministic risk primitives shared by the signal evaluators

pub mod distance;
pub mod hours;
pub mod stats;

pub use distance::haversine_km;
pub use hours::HourBand;
