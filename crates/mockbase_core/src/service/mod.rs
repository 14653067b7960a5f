//! Core use-case services.
//!
//! # Responsibility
//! - Pair the in-memory store and query engine with a persistence backend.
//! - Keep transport layers decoupled from storage details.

pub mod store_service;
