#![doc = include_str!("../README.md")]
//!
//! The binary lives in `main.rs`; modules are exposed here for
//! integration testing.

pub mod artifact;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod output;
