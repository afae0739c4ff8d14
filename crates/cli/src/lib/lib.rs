pub mod commands;
pub mod common;
pub mod repl;

pub use commands::Cli;
