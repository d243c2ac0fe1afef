//! Server module for building the panel HTTP server
//!
//! This module provides a `ServerBuilder` that mounts:
//! - Routes for every registered resource
//! - The navigation menu
//! - Health check routes

pub mod builder;
pub mod registry;

pub use builder::ServerBuilder;
pub use registry::{ResourceDescriptor, ResourceRegistry};
