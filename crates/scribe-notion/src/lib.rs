//! # scribe-notion
//!
//! Notion workspace client for the scribe notes agent.
//!
//! [`NotionClient`] implements [`scribe_core::WorkspaceClient`] over the
//! Notion REST API: page search, block listing, page creation, block append,
//! and archiving. Raw Notion page and block objects are flattened into the
//! core [`Document`](scribe_core::Document) and [`Block`](scribe_core::Block)
//! models here so nothing above this crate sees Notion's wire format.
//!
//! With the `mock` feature, [`memory::InMemoryWorkspace`] provides a
//! call-counting in-process workspace for tests.

pub mod client;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod memory;

pub use client::{NotionClient, NotionConfig, DEFAULT_NOTION_URL, DEFAULT_NOTION_VERSION};
