//! Independent signal evaluators, one per fraud dimension
//!
//! Each evaluator reads the shared transaction/history, writes its own
//! state slot plus one node-list entry, and never touches another
//! evaluator's output.

pub mod behavioral;
pub mod device;
pub mod geo;
pub mod temporal;

pub use geo::GeoMode;
