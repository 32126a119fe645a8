//! Core types and matching logic for the Mayberry medical knowledge base.
//!
//! This crate has no database dependencies. Storage backends
//! implement [`store::KnowledgeStore`]; everything else runs synchronously over
//! an immutable [`knowledge::KnowledgeBase`] snapshot loaded from the store.

pub mod analysis;
pub mod disease;
pub mod emergency;
pub mod error;
pub mod health;
pub mod interaction;
pub mod knowledge;
pub mod lab;
pub mod matcher;
pub mod memory;
pub mod reference;
pub mod responder;
pub mod risk;
pub mod store;
pub mod symptom;

#[cfg(test)]
mod fixture;

pub use error::{Error, Result};
