//! Data structures shared by the handler and the CLI.

pub mod config_file;
pub mod credential;
pub mod handler_config;
pub mod shell_result;
