pub mod api;
pub mod candidates;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lazy_fetch;
pub mod model;
pub mod outfit;
pub mod preferences;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use error::{Result, WardrobeError};
