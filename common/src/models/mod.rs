// common/src/models/mod.rs
pub mod audit;
pub mod compliance;
pub mod notification;
pub mod salt;
pub mod template;
pub mod user;
