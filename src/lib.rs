//! Clinical Synth - hosted assistant orchestration for clinical text
//!
//! Routes typed or uploaded clinical content to pre-configured assistants,
//! drives their thread/run lifecycle, and exports the synthesized results.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
