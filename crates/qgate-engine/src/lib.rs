#![forbid(unsafe_code)]

pub mod git;
pub mod link;
pub mod retry;
pub mod sync;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;
