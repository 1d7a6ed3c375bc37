//! # statuseq
//!
//! Application layer for the statuseq comparison engine: configuration,
//! document loading, the CLI, and the HTTP API.
//!
//! All comparison semantics live in `statuseq-core`; this crate only turns
//! files, flags, and requests into calls on a [`statuseq_core::Comparator`].

pub mod api;
pub mod cli;
pub mod config;
pub mod loader;
