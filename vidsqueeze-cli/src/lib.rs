// vidsqueeze-cli/src/lib.rs
//
// Library portion of the vidsqueeze CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, EncodeArgs, LibraryArgs, StrongerArgs};
pub use commands::encode::run_encode;
pub use commands::stronger::run_stronger;
