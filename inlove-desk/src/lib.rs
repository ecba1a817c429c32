//! # inlove-desk
//!
//! Store desk tool for the In Love catalog: resolves scanned payloads,
//! renders and prints product labels, scans QR codes from image files
//! and reports low stock.
//!
//! # Module layout
//!
//! - [`core`] - configuration and errors
//! - [`catalog`] - catalog file loading and reload on change
//! - [`camera`] - image files as a capture device
//! - [`commands`] - one module per CLI command
//! - [`cli`] - argument definitions
//! - [`utils`] - logging
//! - [`watch`] - debounced folder watching

pub mod camera;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
pub mod watch;

pub use core::{Config, DeskError, DeskResult};
