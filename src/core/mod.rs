//! Core kadmin logic: command construction, execution, and interpretation.

pub mod classifier;
pub mod command;
pub mod config;
pub mod handler;
pub mod invoker;
pub mod key_number;
pub mod staging;
