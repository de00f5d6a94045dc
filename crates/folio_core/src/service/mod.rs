//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into consumer-level flows.
//! - Keep CLI/UI layers free of form-state rules.

pub mod editor;
