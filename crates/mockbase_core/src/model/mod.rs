//! Document store data model.
//!
//! # Responsibility
//! - Define the schema-free record shape (`Item`) and collection kinds.
//! - Own the loaded `Store` and its identifier normalization.
//!
//! # Invariants
//! - A collection's kind (list or singleton) is fixed at load time.
//! - Every record in a list collection carries a string `id` after load,
//!   unless the snapshot supplied a non-numeric, non-absent `id` value.

pub mod id;
pub mod item;
pub mod store;
