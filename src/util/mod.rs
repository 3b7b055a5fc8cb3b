//! Utility modules for process execution, executable lookup, and filesystem access.

pub mod exec;
pub mod fs;
pub mod privilege;
pub mod resolver;
