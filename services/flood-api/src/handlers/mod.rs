//! HTTP request handlers for the flood API.

pub mod flood_map;
pub mod health;
pub mod upload;
