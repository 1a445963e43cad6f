pub mod config;
pub mod models;
pub mod response;
pub mod utils;

pub use crate::config::*;
pub use crate::response::*;
pub use crate::utils::*;
