pub mod config;
pub mod logging;

pub mod checksum;
pub mod downloader;
pub mod error;
pub mod events;
pub mod locator;
pub mod manifest;
pub mod merge;
pub mod orchestrator;
pub mod paths;
pub mod retry;
pub mod selection;
pub mod storage;

pub use error::{Error, Result};
