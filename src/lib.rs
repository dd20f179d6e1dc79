//! indico-store - Local data layer for an event client
//!
//! Keeps the recently viewed items, the user's category configuration and
//! compacts the auxiliary blob cache on a schedule.

pub mod categories;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod maintenance;
pub mod storage;

use thiserror::Error;

/// Main error type for indico-store
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
