#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod json;
pub mod key;
pub mod traits;
pub mod types;
