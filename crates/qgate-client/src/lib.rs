#![forbid(unsafe_code)]

mod decode;
mod http;

pub use http::{HttpBranchSource, HttpGateServer};
