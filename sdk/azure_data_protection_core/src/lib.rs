#![doc = include_str!("../README.md")]

pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod version;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use error::{DataProtectionError, DataProtectionResult};
