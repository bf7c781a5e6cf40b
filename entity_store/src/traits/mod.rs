//! Trait definitions
//!
//! This module defines the storage contract and the entity metadata trait.

pub mod record;
pub mod store;

pub use record::Record;
pub use store::{EntityStream, Store};
