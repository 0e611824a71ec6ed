#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::StoreError;
pub use store::{slugify, CityStore};
