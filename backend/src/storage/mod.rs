//! # Storage Module
//!
//! The managed backend's document store and identity provider, seen through
//! the [`DocumentStore`] and [`IdentityProvider`] traits. Domain services only
//! depend on the traits; [`memory`] provides in-process implementations and
//! [`records`] the mapping between stored field maps and shared types.

pub mod memory;
pub mod records;
pub mod traits;

pub use memory::{InMemoryDocumentStore, InMemoryIdentityProvider};
pub use traits::{Document, DocumentStore, Filter, IdentityProvider, OrderBy, Record};
