//! # scribe-core
//!
//! Core types, traits, and abstractions for the scribe notes agent.
//!
//! This crate provides the data model shared by every other scribe crate
//! (documents, blocks, embedding entries), the error type, and the traits
//! through which the agent talks to its remote collaborators: the document
//! workspace, the embedding service, and the reasoning service.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
