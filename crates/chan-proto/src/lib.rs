pub mod channel;
pub mod config;
pub mod error;
pub mod format;
pub mod platform;
pub mod ratio;

pub use error::{Error, Result};
