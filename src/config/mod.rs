//! Configuration and CLI handling

pub mod cli;
pub mod file;
pub mod settings;

pub use cli::{Cli, Command};
pub use file::FileConfig;
pub use settings::Settings;
