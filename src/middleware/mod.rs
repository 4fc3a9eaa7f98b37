pub mod response;

pub use response::{ApiResponse, ApiResult, ListResponse};
