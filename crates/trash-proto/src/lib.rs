//! Shared pieces of the trash panel: wire types, configuration and the REST
//! client for the server-side trash extension.

pub mod client;
pub mod config;
pub mod platform;
pub mod protocol;

pub use client::{ApiError, TrashClient};
pub use protocol::{TrashEntry, TrashListing};
