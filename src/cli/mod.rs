//! CLI command implementations

pub mod error;
pub mod fetch;
pub mod regions;

pub use error::CliError;
pub use fetch::{Cli, Commands, FetchArgs};
pub use regions::RegionsCommand;
