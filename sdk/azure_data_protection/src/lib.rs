#![doc = include_str!("../README.md")]

pub mod backup_instances;
pub mod backup_policies;
pub mod backup_vaults;
pub mod client;
pub mod jobs;
pub mod models;
pub mod operations;
pub mod paging;
pub mod registry;

pub use client::DataProtectionClient;
