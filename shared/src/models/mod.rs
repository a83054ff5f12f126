//! Domain models for the Microgreens Grow Tracker

mod harvest;
mod planting;
mod variety;

pub use harvest::*;
pub use planting::*;
pub use variety::*;
