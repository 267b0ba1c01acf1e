mod agent;
mod agent_builder;
mod configs;
mod error;

pub use agent::*;
pub use agent_builder::*;
pub use configs::*;
pub use error::*;
