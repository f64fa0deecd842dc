pub mod config;
pub mod error;
pub mod runner;

pub use config::Config;
pub use error::Error;
pub use runner::{Runner, SourceType, DEFAULT_TARGET};
