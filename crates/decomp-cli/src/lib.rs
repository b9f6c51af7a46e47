//! Command-line front end for decompilation project data.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
