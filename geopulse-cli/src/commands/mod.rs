//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`locate`] - One-shot acquisition
//! - [`run`] - Main command (location screen and push listener)
//! - [`send`] - One-shot report

pub mod common;
pub mod config;
pub mod locate;
pub mod run;
pub mod send;
