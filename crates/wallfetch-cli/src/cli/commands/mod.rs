//! CLI command handlers. Each command is in its own file.

mod completions;
mod config;
mod name;
mod once;
mod run;

pub use completions::run_completions;
pub use config::run_config;
pub use name::run_name;
pub use once::run_once;
pub use run::run_daemon;
