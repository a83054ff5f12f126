//! HTTP request handlers

pub mod calendar;
pub mod harvest;
pub mod health;
pub mod planting;
pub mod reporting;
pub mod variety;

pub use calendar::*;
pub use harvest::*;
pub use health::*;
pub use planting::*;
pub use reporting::*;
pub use variety::*;
