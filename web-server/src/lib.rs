// web-server/src/lib.rs
pub mod api;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod salt;
pub mod state;
pub mod store;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
