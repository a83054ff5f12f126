//! Business logic services for the Microgreens Grow Tracker

pub mod calendar;
pub mod harvest;
pub mod planting;
pub mod reporting;
pub mod variety;

pub use calendar::CalendarService;
pub use harvest::HarvestService;
pub use planting::PlantingService;
pub use reporting::ReportingService;
pub use variety::VarietyService;
