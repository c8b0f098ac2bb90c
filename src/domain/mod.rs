//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (assistant/thread/run ids, use cases)
//! - `registry` - Use case to assistant resolution and template discovery
//! - `orchestration` - Thread/run lifecycle and result extraction
//! - `ingestion` - Uploaded documents to text or structured HTML
//! - `export` - Result serialization and display

pub mod export;
pub mod foundation;
pub mod ingestion;
pub mod orchestration;
pub mod registry;
