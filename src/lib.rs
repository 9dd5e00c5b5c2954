pub mod args;
pub mod batch;
pub mod commands;
pub mod error;
pub mod logging;
pub mod merge;
pub mod options;
pub mod settings;
pub mod visuals;
