pub mod building_service;

pub use building_service::{BuildingError, BuildingService};
