pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod output;
