//! Shared types and the planting lifecycle core for the Microgreens Grow Tracker
//!
//! This crate contains the pure derivation logic and models shared between
//! the backend, the browser (via WASM), and other components of the system.

pub mod calendar;
pub mod dates;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod report;
pub mod types;
pub mod validation;

pub use calendar::*;
pub use dates::*;
pub use error::*;
pub use lifecycle::*;
pub use models::*;
pub use report::*;
pub use types::*;
pub use validation::*;
