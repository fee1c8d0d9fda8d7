//! # mathplan (library target)
//!
//! The app's modules, exposed as a library so integration tests can drive
//! the router and CLI plumbing directly. The binary in `main.rs` is a thin
//! wrapper over [`cli::execute`].

pub mod api;
pub mod cli;
pub mod config;
