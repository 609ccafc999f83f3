pub mod cli;
pub mod config;
pub mod error;
pub mod paths;
pub mod records;
pub mod rewrite;

pub use error::{Error, Result};
