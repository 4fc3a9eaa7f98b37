pub mod building;
pub mod validation;

pub use building::{Building, BuildingFields, BuildingFilter, BuildingPage, BuildingQuery, NewBuilding};
pub use validation::{FieldViolation, Rule, ValidationErrors};
