pub mod coach;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod progress;
pub mod render;
pub mod submitter;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::{Cli, Command, CoachCommand, Config};
pub use endpoint::{Endpoint, HttpEndpoint};
pub use error::ClientError;
