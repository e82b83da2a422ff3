//! Plugin loading integration test modules

pub mod registered_modules;
pub mod working_directory;
