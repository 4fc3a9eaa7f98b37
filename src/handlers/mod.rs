pub mod building;
pub mod health;
