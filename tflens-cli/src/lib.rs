//! tflens CLI library
//!
//! Exposes argument definitions, command handlers and output helpers so the
//! binary stays a thin dispatcher and the handlers can be tested directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
